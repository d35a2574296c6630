//! Precision-safe decimal types for quoting.
//!
//! Uses `rust_decimal` for exact decimal arithmetic on prices and fill
//! sizes. Values arriving as `f64` (foreign callers, JSON) are converted
//! once at the edge through the checked constructors below.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Convert an observed `f64` price.
    ///
    /// Rejects NaN, infinities, zero and negative values: a log-return
    /// against a non-positive price is undefined.
    pub fn try_from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoreError::InvalidPrice(value.to_string()));
        }
        Decimal::from_f64(value)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidPrice(value.to_string()))
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for statistics and foreign callers.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// `self * factor`, or `None` if the result leaves `Decimal` range.
    #[inline]
    pub fn checked_scale(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fill size with exact decimal precision.
///
/// Always a magnitude; direction is carried separately by `OrderSide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Convert a reported `f64` trade volume. Negative and non-finite
    /// values are rejected; zero is allowed.
    pub fn try_from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidSize(value.to_string()));
        }
        Decimal::from_f64(value)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidSize(value.to_string()))
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
