//! Replay error types.

use skew_mm::QuoterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Malformed event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Quoter error: {0}")]
    Quoter(#[from] QuoterError),

    #[error("Output encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReplayResult<T> = Result<T, ReplayError>;
