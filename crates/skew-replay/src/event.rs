//! Replay input and output lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skew_core::{InstrumentKey, OrderSide, Price, Size};
use skew_mm::Quote;

/// One line of the event file.
///
/// Numbers may be given as JSON numbers or decimal strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEvent {
    Price {
        instrument: InstrumentKey,
        price: Price,
    },
    Fill {
        instrument: InstrumentKey,
        volume: Size,
        price: Price,
        side: OrderSide,
    },
}

impl ReplayEvent {
    pub fn instrument(&self) -> &InstrumentKey {
        match self {
            Self::Price { instrument, .. } | Self::Fill { instrument, .. } => instrument,
        }
    }
}

/// Output line emitted for each price event.
#[derive(Debug, Serialize)]
pub struct QuoteLine<'a> {
    pub instrument: &'a InstrumentKey,
    pub price: Price,
    #[serde(flatten)]
    pub quote: &'a Quote,
}

/// End-of-run state for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub instrument: InstrumentKey,
    pub position: Decimal,
    pub avg_price: Price,
    pub volatility: f64,
    pub fill_count: u64,
}
