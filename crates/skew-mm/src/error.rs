//! Quote engine error types.

use skew_core::{CoreError, InstrumentKey};
use skew_telemetry::Metrics;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq)]
pub enum QuoterError {
    #[error("Invalid price for {instrument}: {price}")]
    InvalidPrice {
        instrument: InstrumentKey,
        price: String,
    },

    #[error("Negative trade volume for {instrument}: {volume}")]
    NegativeVolume {
        instrument: InstrumentKey,
        volume: String,
    },

    #[error("Arithmetic overflow for {instrument} in {operation}")]
    Overflow {
        instrument: InstrumentKey,
        operation: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl QuoterError {
    /// Stable label for metrics and foreign status mapping.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPrice { .. } | Self::Core(CoreError::InvalidPrice(_)) => "invalid_price",
            Self::NegativeVolume { .. } | Self::Core(CoreError::InvalidSize(_)) => {
                "negative_volume"
            }
            Self::Core(CoreError::InvalidInstrument(_)) => "invalid_instrument",
            Self::Overflow { .. } => "overflow",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }

    /// Log and count a rejected input before handing the error back.
    pub fn rejected(self) -> Self {
        warn!(reason = self.reason(), error = %self, "Input rejected");
        Metrics::input_rejected(self.reason());
        self
    }
}

pub type QuoterResult<T> = Result<T, QuoterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_labels() {
        let err = QuoterError::InvalidPrice {
            instrument: InstrumentKey::new("AAPL"),
            price: "-1".to_string(),
        };
        assert_eq!(err.reason(), "invalid_price");
        assert_eq!(err.to_string(), "Invalid price for AAPL: -1");

        let err: QuoterError = CoreError::InvalidSize("-3".to_string()).into();
        assert_eq!(err.reason(), "negative_volume");

        let err: QuoterError = CoreError::InvalidInstrument(String::new()).into();
        assert_eq!(err.reason(), "invalid_instrument");

        let err = QuoterError::Overflow {
            instrument: InstrumentKey::new("AAPL"),
            operation: "quote",
        };
        assert_eq!(err.reason(), "overflow");
        assert_eq!(err.to_string(), "Arithmetic overflow for AAPL in quote");
    }
}
