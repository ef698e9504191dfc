//! stocksent Core
//!
//! Types shared across the stocksent crates:
//! - the error type and result alias
//! - the closed set of sentiment labels

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::Sentiment;
