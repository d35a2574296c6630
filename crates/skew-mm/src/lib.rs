//! Inventory-skewed quote engine.
//!
//! Provides per-instrument quoting:
//! - Rolling realized volatility over a bounded price window
//! - Inventory tracking with volume-weighted average entry price
//! - Bid/offer computation skewed by inventory regime
//!
//! # Architecture
//!
//! ```text
//! Observed price → QuoteEngine.quote()
//!                   ├─ VolatilityEstimator: record price, annualized vol
//!                   ├─ InventoryBook: signed volume → InventoryRegime
//!                   └─ compute_quote: regime factors × vol, clamped
//!                        ↓
//!                   Quote { bid, offer, volatility }
//!
//! Reported fill  → QuoteEngine.apply_fill() → InventoryBook
//! ```
//!
//! `QuoteEngine` is the single-owner form; `SharedQuoteEngine` offers the
//! same operations behind one lock per instrument.

pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod quote_engine;
pub mod shared;
pub mod volatility;

pub use config::QuoterConfig;
pub use engine::QuoteEngine;
pub use error::{QuoterError, QuoterResult};
pub use inventory::{InventoryBook, Position};
pub use quote_engine::{compute_quote, InventoryRegime, Quote, SpreadFactors};
pub use shared::SharedQuoteEngine;
pub use volatility::{PriceHistory, VolatilityEstimator, VolatilityParams};
