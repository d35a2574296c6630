//! Core domain types for the quote engine.
//!
//! This crate provides the primitives shared by every other crate:
//! - `InstrumentKey`: opaque ticker that partitions all engine state
//! - `Price`, `Size`: precision-safe numeric types
//! - `OrderSide`: direction of a reported fill

pub mod decimal;
pub mod error;
pub mod instrument;
pub mod order;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use instrument::InstrumentKey;
pub use order::OrderSide;
