pub mod parser;
pub mod sizing;

pub use parser::{parse_signal, ParseError};
pub use sizing::{compute_sizing, SizingError, DEFAULT_ENTRY_OFFSET};
