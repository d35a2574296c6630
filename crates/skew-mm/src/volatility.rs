//! Rolling realized volatility per instrument.
//!
//! Each instrument keeps the most recent `history_window` observed prices.
//! Volatility is the Bessel-corrected standard deviation of consecutive
//! log-returns over that window, annualized by `sqrt(trading_days)` and
//! clamped to `[volatility_floor, volatility_cap]`.
//!
//! The statistic is recomputed on every read. The window is small and
//! bounded, so there is nothing worth caching.

use std::collections::{HashMap, VecDeque};

use skew_core::{InstrumentKey, Price};

use crate::config::QuoterConfig;
use crate::error::{QuoterError, QuoterResult};

/// Bounded FIFO of observed prices for one instrument.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    prices: VecDeque<Price>,
    capacity: usize,
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            prices: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a price, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, price: Price) {
        self.prices.push_back(price);
        while self.prices.len() > self.capacity {
            self.prices.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Retained prices, oldest first.
    pub fn prices(&self) -> Vec<Price> {
        self.prices.iter().copied().collect()
    }

    /// `ln(p[i] / p[i-1])` over consecutive retained prices.
    pub fn log_returns(&self) -> Vec<f64> {
        self.prices
            .iter()
            .zip(self.prices.iter().skip(1))
            .map(|(prev, next)| (next.to_f64() / prev.to_f64()).ln())
            .collect()
    }
}

/// Parameters that turn a price window into a volatility figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityParams {
    pub default_volatility: f64,
    pub floor: f64,
    pub cap: f64,
    /// `sqrt(trading_days)`.
    pub annualization: f64,
}

impl VolatilityParams {
    pub fn from_config(config: &QuoterConfig) -> Self {
        Self {
            default_volatility: config.default_volatility,
            floor: config.volatility_floor,
            cap: config.volatility_cap,
            annualization: f64::from(config.trading_days).sqrt(),
        }
    }

    /// Annualized realized volatility of a window.
    ///
    /// Fewer than two prices yields `default_volatility` unclamped. A
    /// single log-return leaves the sample variance undefined (0/0); that
    /// and any other non-finite estimate resolve to the cap.
    pub fn realized(&self, history: &PriceHistory) -> f64 {
        if history.len() < 2 {
            return self.default_volatility;
        }

        let raw = sample_std_dev(&history.log_returns()) * self.annualization;
        if !raw.is_finite() {
            return self.cap;
        }
        raw.max(self.floor).min(self.cap)
    }
}

/// Sample standard deviation (divides by `n - 1`). NaN for fewer than two
/// values.
fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Tracks price windows for every instrument and derives volatility.
#[derive(Debug)]
pub struct VolatilityEstimator {
    histories: HashMap<InstrumentKey, PriceHistory>,
    window: usize,
    params: VolatilityParams,
}

impl VolatilityEstimator {
    pub fn new(config: &QuoterConfig) -> Self {
        Self {
            histories: HashMap::new(),
            window: config.history_window,
            params: VolatilityParams::from_config(config),
        }
    }

    /// Record an observed trade price.
    ///
    /// Non-positive prices are rejected and leave the history untouched.
    pub fn record_price(&mut self, instrument: &InstrumentKey, price: Price) -> QuoterResult<()> {
        if !price.is_positive() {
            return Err(QuoterError::InvalidPrice {
                instrument: instrument.clone(),
                price: price.to_string(),
            }
            .rejected());
        }

        match self.histories.get_mut(instrument) {
            Some(history) => history.push(price),
            None => {
                let mut history = PriceHistory::new(self.window);
                history.push(price);
                self.histories.insert(instrument.clone(), history);
            }
        }
        Ok(())
    }

    /// Annualized realized volatility, or the default for unknown or
    /// under-sampled instruments.
    pub fn volatility(&self, instrument: &InstrumentKey) -> f64 {
        self.histories
            .get(instrument)
            .map(|h| self.params.realized(h))
            .unwrap_or(self.params.default_volatility)
    }

    /// Retained prices for an instrument, oldest first.
    pub fn history(&self, instrument: &InstrumentKey) -> Vec<Price> {
        self.histories
            .get(instrument)
            .map(PriceHistory::prices)
            .unwrap_or_default()
    }

    /// Number of retained prices for an instrument.
    pub fn sample_count(&self, instrument: &InstrumentKey) -> usize {
        self.histories.get(instrument).map(|h| h.len()).unwrap_or(0)
    }

    /// Forget an instrument's history.
    pub fn reset(&mut self, instrument: &InstrumentKey) {
        self.histories.remove(instrument);
    }

    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentKey> {
        self.histories.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn aapl() -> InstrumentKey {
        InstrumentKey::new("AAPL")
    }

    fn px(value: Decimal) -> Price {
        Price::new(value)
    }

    fn default_estimator() -> VolatilityEstimator {
        VolatilityEstimator::new(&QuoterConfig::default())
    }

    #[test]
    fn test_unknown_instrument_default() {
        let estimator = default_estimator();
        assert_eq!(estimator.volatility(&InstrumentKey::new("XYZ")), 1.0);
        assert_eq!(estimator.sample_count(&InstrumentKey::new("XYZ")), 0);
        assert!(estimator.history(&InstrumentKey::new("XYZ")).is_empty());
    }

    #[test]
    fn test_single_price_default() {
        let mut estimator = default_estimator();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        assert_eq!(estimator.volatility(&aapl()), 1.0);
    }

    #[test]
    fn test_rolling_window_eviction() {
        let mut estimator = default_estimator();
        for i in 1..=25 {
            estimator
                .record_price(&aapl(), px(Decimal::from(100 + i)))
                .unwrap();
        }

        let history = estimator.history(&aapl());
        assert_eq!(history.len(), 20);
        assert_eq!(history[0], px(dec!(106)));
        assert_eq!(history[19], px(dec!(125)));
    }

    #[test]
    fn test_constant_prices_hit_floor() {
        let mut estimator = default_estimator();
        for _ in 0..10 {
            estimator.record_price(&aapl(), px(dec!(50))).unwrap();
        }
        assert!((estimator.volatility(&aapl()) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_two_prices_single_return_resolves_to_cap() {
        let mut estimator = default_estimator();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        assert_eq!(estimator.volatility(&aapl()), 1.0);

        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        assert!((estimator.volatility(&aapl()) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_extreme_moves_hit_cap() {
        let mut estimator = default_estimator();
        for i in 0..20 {
            let price = if i % 2 == 0 { dec!(100) } else { dec!(150) };
            estimator.record_price(&aapl(), px(price)).unwrap();
        }
        assert!((estimator.volatility(&aapl()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_small_moves_annualized() {
        let mut estimator = default_estimator();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        estimator.record_price(&aapl(), px(dec!(100.1))).unwrap();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();

        // r = +ln(1.001), -ln(1.001); mean 0; sd = ln(1.001) * sqrt(2)
        let r = (100.1_f64 / 100.0).ln();
        let expected = (2.0 * r * r).sqrt() * 252f64.sqrt();
        let vol = estimator.volatility(&aapl());
        assert!((vol - expected).abs() < 1e-9);
        assert!((vol - 0.0224).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let mut estimator = default_estimator();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();

        let err = estimator.record_price(&aapl(), px(dec!(0))).unwrap_err();
        assert!(matches!(err, QuoterError::InvalidPrice { .. }));
        assert!(estimator.record_price(&aapl(), px(dec!(-5))).is_err());
        assert_eq!(estimator.sample_count(&aapl()), 1);
    }

    #[test]
    fn test_multi_instrument_independence() {
        let mut estimator = default_estimator();
        let msft = InstrumentKey::new("MSFT");

        for i in 0..10 {
            let wild = if i % 2 == 0 { dec!(100) } else { dec!(120) };
            estimator.record_price(&aapl(), px(wild)).unwrap();
            estimator.record_price(&msft, px(dec!(300))).unwrap();
        }

        assert!(estimator.volatility(&aapl()) > 0.5);
        assert!((estimator.volatility(&msft) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut estimator = default_estimator();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        estimator.record_price(&aapl(), px(dec!(100))).unwrap();
        estimator.reset(&aapl());

        assert_eq!(estimator.sample_count(&aapl()), 0);
        assert_eq!(estimator.volatility(&aapl()), 1.0);
    }

    #[test]
    fn test_custom_window() {
        let config = QuoterConfig {
            history_window: 3,
            ..Default::default()
        };
        let mut estimator = VolatilityEstimator::new(&config);
        for i in 0..10 {
            estimator
                .record_price(&aapl(), px(Decimal::from(10 + i)))
                .unwrap();
        }
        assert_eq!(
            estimator.history(&aapl()),
            vec![px(dec!(17)), px(dec!(18)), px(dec!(19))]
        );
    }

    #[test]
    fn test_sample_std_dev_bessel() {
        // values 1, 2, 3, 4: mean 2.5, sum_sq 5, / 3
        let sd = sample_std_dev(&[1.0, 2.0, 3.0, 4.0]);
        assert!((sd - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(sample_std_dev(&[0.3]).is_nan());
    }
}
