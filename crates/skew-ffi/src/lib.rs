//! Foreign-call boundary for the quote engine.
//!
//! - `capi`: `extern "C"` functions over an opaque engine handle, for
//!   hosts that load the library dynamically
//! - `python` (feature `python`): the same operations as a PyO3 extension
//!   module
//!
//! Both surfaces go through `boundary`, which turns raw `f64`/string
//! arguments into validated domain types.

pub mod boundary;
pub mod capi;
#[cfg(feature = "python")]
pub mod python;

pub use capi::{
    skew_apply_fill, skew_engine_create, skew_engine_create_with_config, skew_engine_destroy,
    skew_get_avg_price, skew_get_position, skew_get_volatility, skew_init_logging, skew_quote,
    SkewEngine, SkewQuote, SKEW_ERR_CONFIG, SKEW_ERR_INSTRUMENT, SKEW_ERR_NULL, SKEW_ERR_OVERFLOW,
    SKEW_ERR_PRICE, SKEW_ERR_VOLUME, SKEW_OK,
};
