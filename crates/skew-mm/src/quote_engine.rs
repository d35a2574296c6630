//! Quote price calculation.
//!
//! Computes a bid/offer pair from:
//! - the observed reference price
//! - the instrument's realized volatility (scales both half-spreads)
//! - the inventory regime (selects the bid/offer factor pair)
//!
//! The regime table is data: `InventoryRegime::factors` is the whole
//! policy, and `compute_quote` only scales, clamps and applies it.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use skew_core::Price;

use crate::config::QuoterConfig;

/// Inventory regime selected by the sign of the net position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryRegime {
    Flat,
    Long,
    Short,
}

impl InventoryRegime {
    pub fn from_volume(volume: Decimal) -> Self {
        if volume.is_zero() {
            Self::Flat
        } else if volume.is_sign_positive() {
            Self::Long
        } else {
            Self::Short
        }
    }

    /// Unscaled (bid, offer) half-spread factors for this regime.
    ///
    /// | regime | bid   | offer |
    /// |--------|-------|-------|
    /// | Flat   | flat  | flat  |
    /// | Long   | tight | wide  |
    /// | Short  | wide  | tight |
    pub fn factors(&self, config: &QuoterConfig) -> SpreadFactors {
        match self {
            Self::Flat => SpreadFactors::new(config.flat_half_spread, config.flat_half_spread),
            Self::Long => SpreadFactors::new(config.tight_half_spread, config.wide_half_spread),
            Self::Short => SpreadFactors::new(config.wide_half_spread, config.tight_half_spread),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl std::fmt::Display for InventoryRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (bid, offer) pair of half-spreads, as fractions of price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpreadFactors {
    pub bid: Decimal,
    pub offer: Decimal,
}

impl SpreadFactors {
    pub fn new(bid: Decimal, offer: Decimal) -> Self {
        Self { bid, offer }
    }

    /// Multiply both sides by the volatility multiplier.
    pub fn scaled(&self, volatility: Decimal) -> Option<Self> {
        Some(Self::new(
            self.bid.checked_mul(volatility)?,
            self.offer.checked_mul(volatility)?,
        ))
    }

    /// Clamp both sides to `[min, max]`.
    pub fn clamped(&self, min: Decimal, max: Decimal) -> Self {
        Self::new(self.bid.max(min).min(max), self.offer.max(min).min(max))
    }
}

/// A two-sided quote for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub bid: Price,
    pub offer: Price,
    /// Annualized volatility the quote was scaled by.
    pub volatility: f64,
    pub regime: InventoryRegime,
    /// Applied bid half-spread after clamping.
    pub bid_half_spread: Decimal,
    /// Applied offer half-spread after clamping.
    pub offer_half_spread: Decimal,
}

/// Calculate a quote around `price`.
///
/// # Arguments
/// * `price` - Observed reference price
/// * `volume` - Signed net inventory (positive = long)
/// * `volatility` - Annualized volatility multiplier
/// * `config` - Spread factors and clamp bounds
///
/// Returns `None` when the offer (or the scaled factors) would leave
/// `Decimal` range.
pub fn compute_quote(
    price: Price,
    volume: Decimal,
    volatility: f64,
    config: &QuoterConfig,
) -> Option<Quote> {
    let regime = InventoryRegime::from_volume(volume);
    let vol_multiplier = Decimal::from_f64(volatility).unwrap_or(Decimal::ONE);

    let half = regime
        .factors(config)
        .scaled(vol_multiplier)?
        .clamped(config.min_half_spread, config.max_half_spread);

    Some(Quote {
        bid: price.checked_scale(Decimal::ONE - half.bid)?,
        offer: price.checked_scale(Decimal::ONE + half.offer)?,
        volatility,
        regime,
        bid_half_spread: half.bid,
        offer_half_spread: half.offer,
    })
}
