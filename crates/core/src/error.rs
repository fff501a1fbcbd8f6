//! Error types for the overlay crates.
//!
//! Only configuration and instrument validation produce errors. Degenerate
//! render-path inputs (empty ranges, zero price spans) are recovered
//! locally by skipping the affected computation and never surface here.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the overlay crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Instrument metadata error.
    #[error("Instrument error: {0}")]
    Instrument(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an instrument error.
    pub fn instrument(msg: impl Into<String>) -> Self {
        Error::Instrument(msg.into())
    }
}
