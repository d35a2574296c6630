//! Single-owner quote engine.
//!
//! Composes the volatility estimator and the inventory book:
//!
//! ```text
//! quote(instrument, price)
//!   ├─ VolatilityEstimator.record_price + volatility
//!   ├─ InventoryBook.volume
//!   └─ compute_quote → Quote { bid, offer, volatility }
//!
//! apply_fill(instrument, size, price, side)
//!   └─ InventoryBook.record_fill (position state only)
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use skew_core::{InstrumentKey, OrderSide, Price, Size};
use skew_telemetry::Metrics;
use tracing::debug;

use crate::config::QuoterConfig;
use crate::error::{QuoterError, QuoterResult};
use crate::inventory::{InventoryBook, Position};
use crate::quote_engine::{compute_quote, Quote};
use crate::volatility::VolatilityEstimator;

/// Quote engine owning all per-instrument state.
///
/// Mutating calls take `&mut self`; hosts that need to share one engine
/// across threads use [`crate::SharedQuoteEngine`] instead.
#[derive(Debug)]
pub struct QuoteEngine {
    config: QuoterConfig,
    volatility: VolatilityEstimator,
    inventory: InventoryBook,
}

impl QuoteEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: QuoterConfig) -> QuoterResult<Self> {
        config.validate()?;
        Ok(Self {
            volatility: VolatilityEstimator::new(&config),
            inventory: InventoryBook::new(),
            config,
        })
    }

    pub fn config(&self) -> &QuoterConfig {
        &self.config
    }

    /// Observe `price` and quote around it.
    ///
    /// Every quote also advances the instrument's price history, including
    /// a quote that fails with [`QuoterError::Overflow`].
    pub fn quote(&mut self, instrument: &InstrumentKey, price: Price) -> QuoterResult<Quote> {
        self.volatility.record_price(instrument, price)?;
        let volatility = self.volatility.volatility(instrument);
        let volume = self.inventory.volume(instrument);

        let quote = compute_quote(price, volume, volatility, &self.config).ok_or_else(|| {
            QuoterError::Overflow {
                instrument: instrument.clone(),
                operation: "quote",
            }
            .rejected()
        })?;

        debug!(
            instrument = %instrument,
            price = %price,
            volume = %volume,
            volatility,
            regime = %quote.regime,
            bid = %quote.bid,
            offer = %quote.offer,
            "Quote computed"
        );
        Metrics::quote_produced(instrument.as_str(), quote.regime.as_str(), volatility);

        Ok(quote)
    }

    /// Report a fill. Mutates position state only.
    pub fn apply_fill(
        &mut self,
        instrument: &InstrumentKey,
        size: Size,
        price: Price,
        side: OrderSide,
    ) -> QuoterResult<()> {
        let position = self.inventory.record_fill(instrument, side, price, size)?;

        debug!(
            instrument = %instrument,
            side = %side,
            size = %size,
            price = %price,
            volume = %position.volume,
            avg_price = %position.avg_price,
            "Fill applied"
        );
        Metrics::fill_applied(
            instrument.as_str(),
            side.as_str(),
            position.volume.to_f64().unwrap_or(0.0),
        );

        Ok(())
    }

    /// Signed net volume, zero for unknown instruments.
    pub fn position(&self, instrument: &InstrumentKey) -> Decimal {
        self.inventory.volume(instrument)
    }

    /// Average entry price, zero for unknown instruments.
    pub fn avg_price(&self, instrument: &InstrumentKey) -> Price {
        Price::new(self.inventory.avg_price(instrument))
    }

    /// Current annualized volatility without observing a new price.
    pub fn volatility(&self, instrument: &InstrumentKey) -> f64 {
        self.volatility.volatility(instrument)
    }

    /// Full position record, if the instrument has seen a fill.
    pub fn position_state(&self, instrument: &InstrumentKey) -> Option<&Position> {
        self.inventory.get(instrument)
    }

    /// Retained price history, oldest first.
    pub fn history(&self, instrument: &InstrumentKey) -> Vec<Price> {
        self.volatility.history(instrument)
    }

    /// Every instrument with history or inventory, sorted.
    pub fn instruments(&self) -> Vec<InstrumentKey> {
        let mut keys: Vec<InstrumentKey> = self
            .volatility
            .instruments()
            .chain(self.inventory.iter().map(|(k, _)| k))
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Return one instrument to its virgin state.
    pub fn reset(&mut self, instrument: &InstrumentKey) {
        self.volatility.reset(instrument);
        self.inventory.reset(instrument);
        debug!(instrument = %instrument, "Instrument reset");
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self {
            volatility: VolatilityEstimator::new(&QuoterConfig::default()),
            inventory: InventoryBook::new(),
            config: QuoterConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote_engine::InventoryRegime;
    use rust_decimal_macros::dec;

    fn aapl() -> InstrumentKey {
        InstrumentKey::new("AAPL")
    }

    fn px(value: Decimal) -> Price {
        Price::new(value)
    }

    #[test]
    fn test_first_quote_uses_default_volatility() {
        let mut engine = QuoteEngine::default();
        let quote = engine.quote(&aapl(), px(dec!(100))).unwrap();

        assert_eq!(quote.volatility, 1.0);
        assert_eq!(quote.bid.inner(), dec!(98));
        assert_eq!(quote.offer.inner(), dec!(102));
    }

    #[test]
    fn test_quote_advances_history() {
        let mut engine = QuoteEngine::default();
        engine.quote(&aapl(), px(dec!(100))).unwrap();
        engine.quote(&aapl(), px(dec!(101))).unwrap();

        assert_eq!(engine.history(&aapl()), vec![px(dec!(100)), px(dec!(101))]);
    }

    #[test]
    fn test_fill_switches_regime() {
        let mut engine = QuoteEngine::default();
        engine.quote(&aapl(), px(dec!(100))).unwrap();
        engine
            .apply_fill(&aapl(), Size::new(dec!(5)), px(dec!(100)), OrderSide::Buy)
            .unwrap();

        // Two prices, one log-return: undefined variance resolves to the cap
        let quote = engine.quote(&aapl(), px(dec!(100))).unwrap();
        assert_eq!(quote.regime, InventoryRegime::Long);
        assert_eq!(quote.volatility, 1.0);
        assert_eq!(quote.bid.inner(), dec!(99));
        assert_eq!(quote.offer.inner(), dec!(107));
        let bid_distance = dec!(100) - quote.bid.inner();
        let offer_distance = quote.offer.inner() - dec!(100);
        assert!(bid_distance < offer_distance);
    }

    #[test]
    fn test_fill_does_not_touch_history() {
        let mut engine = QuoteEngine::default();
        engine
            .apply_fill(&aapl(), Size::new(dec!(1)), px(dec!(100)), OrderSide::Sell)
            .unwrap();

        assert!(engine.history(&aapl()).is_empty());
        assert_eq!(engine.position(&aapl()), dec!(-1));
    }

    #[test]
    fn test_invalid_price_leaves_state_untouched() {
        let mut engine = QuoteEngine::default();
        engine.quote(&aapl(), px(dec!(100))).unwrap();

        let err = engine.quote(&aapl(), px(dec!(-1))).unwrap_err();
        assert!(matches!(err, QuoterError::InvalidPrice { .. }));
        assert_eq!(engine.history(&aapl()).len(), 1);
    }

    #[test]
    fn test_instruments_sorted_and_deduplicated() {
        let mut engine = QuoteEngine::default();
        let msft = InstrumentKey::new("MSFT");
        engine.quote(&msft, px(dec!(300))).unwrap();
        engine.quote(&aapl(), px(dec!(100))).unwrap();
        engine
            .apply_fill(&aapl(), Size::ONE, px(dec!(100)), OrderSide::Buy)
            .unwrap();

        assert_eq!(engine.instruments(), vec![aapl(), msft]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut engine = QuoteEngine::default();
        engine.quote(&aapl(), px(dec!(100))).unwrap();
        engine.quote(&aapl(), px(dec!(100))).unwrap();
        engine
            .apply_fill(&aapl(), Size::ONE, px(dec!(100)), OrderSide::Buy)
            .unwrap();

        engine.reset(&aapl());
        assert_eq!(engine.position(&aapl()), Decimal::ZERO);
        assert_eq!(engine.avg_price(&aapl()), Price::ZERO);
        assert_eq!(engine.volatility(&aapl()), 1.0);
        assert!(engine.instruments().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = QuoterConfig {
            history_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            QuoteEngine::new(config),
            Err(QuoterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overflow_is_an_error_not_a_panic() {
        let mut engine = QuoteEngine::default();
        engine
            .apply_fill(&aapl(), Size::new(dec!(5)), px(dec!(100)), OrderSide::Buy)
            .unwrap();

        let huge = Price::try_from_f64(7.5e28).unwrap();
        let err = engine.quote(&aapl(), huge).unwrap_err();
        assert!(matches!(err, QuoterError::Overflow { .. }));
        assert_eq!(err.reason(), "overflow");

        assert!(engine.quote(&aapl(), px(dec!(100))).is_ok());
    }
}
