//! Offline replay of recorded prices and fills.
//!
//! Reads JSON-lines events, feeds them through a [`skew_mm::QuoteEngine`]
//! and writes one JSON quote line per price event.

pub mod error;
pub mod event;
pub mod replay;

pub use error::{ReplayError, ReplayResult};
pub use event::{PositionSummary, QuoteLine, ReplayEvent};
pub use replay::{ReplayStats, Replayer};
