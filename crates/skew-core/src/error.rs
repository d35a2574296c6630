//! Error types for skew-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid instrument key: {0:?}")]
    InvalidInstrument(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
