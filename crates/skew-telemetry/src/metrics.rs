//! Prometheus metrics for the quote engine.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on a
//! duplicate metric name, which is a programming error that must surface
//! at first use rather than be swallowed.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, CounterVec, Encoder, GaugeVec, TextEncoder,
};

use crate::error::TelemetryResult;

/// Quotes produced.
/// Labels: instrument, regime (flat/long/short)
pub static QUOTES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "skew_quotes_total",
        "Total quotes produced",
        &["instrument", "regime"]
    )
    .unwrap()
});

/// Fills applied to the inventory book.
pub static FILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "skew_fills_total",
        "Total fills applied",
        &["instrument", "side"]
    )
    .unwrap()
});

/// Inputs rejected by validation.
pub static REJECTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "skew_rejected_total",
        "Total inputs rejected by validation",
        &["reason"]
    )
    .unwrap()
});

/// Annualized volatility used by the most recent quote.
pub static VOLATILITY: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "skew_volatility",
        "Annualized realized volatility at last quote",
        &["instrument"]
    )
    .unwrap()
});

/// Signed net position after the most recent fill.
pub static POSITION: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "skew_position",
        "Signed net position after last fill",
        &["instrument"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a produced quote and the volatility behind it.
    pub fn quote_produced(instrument: &str, regime: &str, volatility: f64) {
        QUOTES_TOTAL.with_label_values(&[instrument, regime]).inc();
        VOLATILITY.with_label_values(&[instrument]).set(volatility);
    }

    /// Record an applied fill and the resulting position.
    pub fn fill_applied(instrument: &str, side: &str, position: f64) {
        FILLS_TOTAL.with_label_values(&[instrument, side]).inc();
        POSITION.with_label_values(&[instrument]).set(position);
    }

    /// Record rejected input.
    pub fn input_rejected(reason: &str) {
        REJECTED_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
