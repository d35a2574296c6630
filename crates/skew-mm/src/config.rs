//! Quote engine configuration.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{QuoterError, QuoterResult};

/// Quote engine configuration.
///
/// Every field has a default, so an empty TOML document yields the
/// canonical engine (20-point window, 252-day annualization, 2%/1%/7%
/// half-spreads clamped to `[0.1%, 10%]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoterConfig {
    /// Number of most recent prices retained per instrument.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Trading days per year used to annualize the per-observation std-dev.
    #[serde(default = "default_trading_days")]
    pub trading_days: u32,

    /// Returned while an instrument has fewer than two prices.
    /// A neutral multiplier rather than a measured volatility.
    #[serde(default = "default_default_volatility")]
    pub default_volatility: f64,

    /// Lower bound on the realized volatility.
    #[serde(default = "default_volatility_floor")]
    pub volatility_floor: f64,

    /// Upper bound on the realized volatility.
    #[serde(default = "default_volatility_cap")]
    pub volatility_cap: f64,

    /// Half-spread factor on both sides while flat.
    #[serde(default = "default_flat_half_spread")]
    pub flat_half_spread: Decimal,

    /// Half-spread factor on the tight side while carrying inventory
    /// (bid when long, offer when short).
    #[serde(default = "default_tight_half_spread")]
    pub tight_half_spread: Decimal,

    /// Half-spread factor on the wide side while carrying inventory
    /// (offer when long, bid when short).
    #[serde(default = "default_wide_half_spread")]
    pub wide_half_spread: Decimal,

    /// Minimum applied half-spread, as a fraction of price.
    #[serde(default = "default_min_half_spread")]
    pub min_half_spread: Decimal,

    /// Maximum applied half-spread, as a fraction of price.
    #[serde(default = "default_max_half_spread")]
    pub max_half_spread: Decimal,
}

impl Default for QuoterConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            trading_days: default_trading_days(),
            default_volatility: default_default_volatility(),
            volatility_floor: default_volatility_floor(),
            volatility_cap: default_volatility_cap(),
            flat_half_spread: default_flat_half_spread(),
            tight_half_spread: default_tight_half_spread(),
            wide_half_spread: default_wide_half_spread(),
            min_half_spread: default_min_half_spread(),
            max_half_spread: default_max_half_spread(),
        }
    }
}

impl QuoterConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> QuoterResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| QuoterError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> QuoterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuoterError::InvalidConfig(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject parameter sets that would break the volatility or spread math.
    pub fn validate(&self) -> QuoterResult<()> {
        if self.history_window < 2 {
            return Err(QuoterError::InvalidConfig(format!(
                "history_window must be at least 2, got {}",
                self.history_window
            )));
        }
        if self.trading_days == 0 {
            return Err(QuoterError::InvalidConfig(
                "trading_days must be positive".to_string(),
            ));
        }
        if !self.default_volatility.is_finite() || self.default_volatility <= 0.0 {
            return Err(QuoterError::InvalidConfig(format!(
                "default_volatility must be positive, got {}",
                self.default_volatility
            )));
        }
        if !(self.volatility_floor > 0.0 && self.volatility_floor <= self.volatility_cap) {
            return Err(QuoterError::InvalidConfig(format!(
                "volatility bounds must satisfy 0 < floor <= cap, got [{}, {}]",
                self.volatility_floor, self.volatility_cap
            )));
        }
        if !self.volatility_cap.is_finite() {
            return Err(QuoterError::InvalidConfig(
                "volatility_cap must be finite".to_string(),
            ));
        }
        for (name, factor) in [
            ("flat_half_spread", self.flat_half_spread),
            ("tight_half_spread", self.tight_half_spread),
            ("wide_half_spread", self.wide_half_spread),
        ] {
            if factor.is_sign_negative() && !factor.is_zero() {
                return Err(QuoterError::InvalidConfig(format!(
                    "{name} must not be negative, got {factor}"
                )));
            }
        }
        if self.min_half_spread.is_sign_negative()
            || self.min_half_spread > self.max_half_spread
            || self.max_half_spread >= Decimal::ONE
        {
            return Err(QuoterError::InvalidConfig(format!(
                "half-spread bounds must satisfy 0 <= min <= max < 1, got [{}, {}]",
                self.min_half_spread, self.max_half_spread
            )));
        }
        Ok(())
    }
}

fn default_history_window() -> usize {
    20
}
fn default_trading_days() -> u32 {
    252
}
fn default_default_volatility() -> f64 {
    1.0
}
fn default_volatility_floor() -> f64 {
    0.01
}
fn default_volatility_cap() -> f64 {
    1.0
}
fn default_flat_half_spread() -> Decimal {
    Decimal::new(2, 2) // 0.02
}
fn default_tight_half_spread() -> Decimal {
    Decimal::new(1, 2) // 0.01
}
fn default_wide_half_spread() -> Decimal {
    Decimal::new(7, 2) // 0.07
}
fn default_min_half_spread() -> Decimal {
    Decimal::new(1, 3) // 0.001
}
fn default_max_half_spread() -> Decimal {
    Decimal::new(10, 2) // 0.10
}
