pub mod order_type;
pub mod signal;
pub mod symbol;

pub use order_type::OrderType;
pub use signal::{SizingReport, TradeSignal};
pub use symbol::SymbolTable;
