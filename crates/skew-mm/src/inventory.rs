//! Inventory tracking for quoting.
//!
//! Tracks signed net volume and volume-weighted average entry price per
//! instrument. Fills are reported by the host; this module never decides
//! them.

use std::collections::HashMap;

use rust_decimal::Decimal;
use skew_core::{InstrumentKey, OrderSide, Price, Size};

use crate::error::{QuoterError, QuoterResult};

/// Inventory state for a single instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Net volume (positive = long, negative = short).
    pub volume: Decimal,
    /// Average entry price. Only meaningful while `volume != 0`.
    pub avg_price: Decimal,
    /// Total number of fills applied.
    pub fill_count: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            volume: Decimal::ZERO,
            avg_price: Decimal::ZERO,
            fill_count: 0,
        }
    }
}

impl Position {
    /// State after a validated fill, or `None` if the blend leaves
    /// `Decimal` range.
    ///
    /// From flat the fill opens the position at its own price. Otherwise the
    /// average is blended as
    /// `(avg * volume + price * size) / (|volume| + size)`
    /// using the pre-fill signed volume, and this blend is applied even
    /// when the fill flips the sign of the position.
    pub fn after_fill(&self, side: OrderSide, price: Price, size: Size) -> Option<Self> {
        let fill_size = size.inner();
        let signed_size = match side {
            OrderSide::Buy => fill_size,
            OrderSide::Sell => -fill_size,
        };

        let (volume, avg_price) = if self.volume.is_zero() {
            (signed_size, price.inner())
        } else {
            let weighted = self
                .avg_price
                .checked_mul(self.volume)?
                .checked_add(price.inner().checked_mul(fill_size)?)?;
            let avg = weighted.checked_div(self.volume.abs().checked_add(fill_size)?)?;
            (self.volume.checked_add(signed_size)?, avg)
        };

        Some(Self {
            volume,
            avg_price,
            fill_count: self.fill_count + 1,
        })
    }
}

/// Manages inventory across all quoted instruments.
#[derive(Debug, Default)]
pub struct InventoryBook {
    positions: HashMap<InstrumentKey, Position>,
}

impl InventoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a fill.
    ///
    /// `size` is a magnitude; direction comes from `side`.
    pub fn record_fill(
        &mut self,
        instrument: &InstrumentKey,
        side: OrderSide,
        price: Price,
        size: Size,
    ) -> QuoterResult<&Position> {
        validate_fill(instrument, price, size)?;

        let next = self
            .positions
            .get(instrument)
            .cloned()
            .unwrap_or_default()
            .after_fill(side, price, size)
            .ok_or_else(|| {
                QuoterError::Overflow {
                    instrument: instrument.clone(),
                    operation: "apply_fill",
                }
                .rejected()
            })?;

        let position = self.positions.entry(instrument.clone()).or_default();
        *position = next;
        Ok(&*position)
    }

    /// Get inventory for an instrument.
    pub fn get(&self, instrument: &InstrumentKey) -> Option<&Position> {
        self.positions.get(instrument)
    }

    /// Signed net volume, zero for unknown instruments.
    pub fn volume(&self, instrument: &InstrumentKey) -> Decimal {
        self.positions
            .get(instrument)
            .map(|p| p.volume)
            .unwrap_or(Decimal::ZERO)
    }

    /// Average entry price, zero for unknown instruments.
    pub fn avg_price(&self, instrument: &InstrumentKey) -> Decimal {
        self.positions
            .get(instrument)
            .map(|p| p.avg_price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Forget an instrument's inventory.
    pub fn reset(&mut self, instrument: &InstrumentKey) {
        self.positions.remove(instrument);
    }

    /// Iterate over all instrument positions.
    pub fn iter(&self) -> impl Iterator<Item = (&InstrumentKey, &Position)> {
        self.positions.iter()
    }
}

/// Reject fills the averaging formula cannot accept.
pub(crate) fn validate_fill(
    instrument: &InstrumentKey,
    price: Price,
    size: Size,
) -> QuoterResult<()> {
    if size.is_negative() {
        return Err(QuoterError::NegativeVolume {
            instrument: instrument.clone(),
            volume: size.to_string(),
        }
        .rejected());
    }
    if !price.is_positive() {
        return Err(QuoterError::InvalidPrice {
            instrument: instrument.clone(),
            price: price.to_string(),
        }
        .rejected());
    }
    Ok(())
}
