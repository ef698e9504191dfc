//! stocksent
//!
//! Interactive terminal front-end for the stock tweet sentiment classifier.

pub mod app;
pub mod cli;
pub mod config;
pub mod repl;

pub use config::AppConfig;
pub use repl::{is_exit, Session, Step};
