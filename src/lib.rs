pub mod chat;
pub mod config;
pub mod core;
pub mod dialogue;
pub mod models;
pub mod report;
pub mod session;
