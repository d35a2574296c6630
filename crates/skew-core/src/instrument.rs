//! Instrument identification.
//!
//! Every piece of engine state (price history, position) is partitioned by
//! an `InstrumentKey`. The key is an opaque ticker: the engine never
//! interprets it beyond equality and hashing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Opaque instrument identifier (e.g. "AAPL").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct InstrumentKey(String);

impl InstrumentKey {
    /// Wrap a ticker without validation.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    /// Validating constructor for keys arriving from outside the process.
    ///
    /// Surrounding whitespace is trimmed; an empty result is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInstrument(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for InstrumentKey {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}
