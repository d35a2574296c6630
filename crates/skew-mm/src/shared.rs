//! Thread-safe quote engine with one lock per instrument.
//!
//! Instruments are fully independent, so each gets its own
//! `parking_lot::Mutex` held behind a `DashMap`. The map shard lock is
//! released before the instrument lock is taken; two threads quoting
//! different instruments never wait on each other.
//!
//! `reset` marks the slot retired under its own lock before unlinking it.
//! An operation that was waiting on that lock sees the flag and retries
//! against the fresh slot, so no write lands in orphaned state.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use skew_core::{InstrumentKey, OrderSide, Price, Size};
use skew_telemetry::Metrics;
use tracing::debug;

use crate::config::QuoterConfig;
use crate::error::{QuoterError, QuoterResult};
use crate::inventory::{validate_fill, Position};
use crate::quote_engine::{compute_quote, Quote};
use crate::volatility::{PriceHistory, VolatilityParams};

/// Everything the engine knows about one instrument.
#[derive(Debug)]
struct InstrumentState {
    history: PriceHistory,
    position: Position,
    /// Set by `reset`; the slot is no longer reachable from the map.
    retired: bool,
}

impl InstrumentState {
    fn new(window: usize) -> Self {
        Self {
            history: PriceHistory::new(window),
            position: Position::default(),
            retired: false,
        }
    }
}

/// `Send + Sync` quote engine for multi-threaded hosts.
#[derive(Debug)]
pub struct SharedQuoteEngine {
    config: QuoterConfig,
    params: VolatilityParams,
    instruments: DashMap<InstrumentKey, Arc<Mutex<InstrumentState>>>,
}

impl SharedQuoteEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: QuoterConfig) -> QuoterResult<Self> {
        config.validate()?;
        Ok(Self {
            params: VolatilityParams::from_config(&config),
            instruments: DashMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &QuoterConfig {
        &self.config
    }

    /// Get or lazily create the instrument slot, releasing the shard lock.
    fn slot(&self, instrument: &InstrumentKey) -> Arc<Mutex<InstrumentState>> {
        if let Some(existing) = self.instruments.get(instrument) {
            return Arc::clone(existing.value());
        }
        let window = self.config.history_window;
        Arc::clone(
            self.instruments
                .entry(instrument.clone())
                .or_insert_with(|| Arc::new(Mutex::new(InstrumentState::new(window))))
                .value(),
        )
    }

    /// Existing slot only; reads never create state.
    fn existing(&self, instrument: &InstrumentKey) -> Option<Arc<Mutex<InstrumentState>>> {
        self.instruments
            .get(instrument)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Run `f` on the live slot, creating it if needed.
    fn update<T>(
        &self,
        instrument: &InstrumentKey,
        f: impl FnOnce(&mut InstrumentState) -> T,
    ) -> T {
        loop {
            let slot = self.slot(instrument);
            let mut state = slot.lock();
            if !state.retired {
                return f(&mut state);
            }
        }
    }

    /// Run `f` on the live slot, if any.
    fn read<T>(
        &self,
        instrument: &InstrumentKey,
        f: impl FnOnce(&InstrumentState) -> T,
    ) -> Option<T> {
        loop {
            let slot = self.existing(instrument)?;
            let state = slot.lock();
            if !state.retired {
                return Some(f(&state));
            }
        }
    }

    /// Observe `price` and quote around it.
    pub fn quote(&self, instrument: &InstrumentKey, price: Price) -> QuoterResult<Quote> {
        if !price.is_positive() {
            return Err(QuoterError::InvalidPrice {
                instrument: instrument.clone(),
                price: price.to_string(),
            }
            .rejected());
        }

        let quote = self
            .update(instrument, |state| {
                state.history.push(price);
                let volatility = self.params.realized(&state.history);
                compute_quote(price, state.position.volume, volatility, &self.config)
            })
            .ok_or_else(|| {
                QuoterError::Overflow {
                    instrument: instrument.clone(),
                    operation: "quote",
                }
                .rejected()
            })?;

        debug!(
            instrument = %instrument,
            price = %price,
            volatility = quote.volatility,
            regime = %quote.regime,
            bid = %quote.bid,
            offer = %quote.offer,
            "Quote computed"
        );
        Metrics::quote_produced(instrument.as_str(), quote.regime.as_str(), quote.volatility);

        Ok(quote)
    }

    /// Report a fill. Mutates position state only.
    pub fn apply_fill(
        &self,
        instrument: &InstrumentKey,
        size: Size,
        price: Price,
        side: OrderSide,
    ) -> QuoterResult<()> {
        validate_fill(instrument, price, size)?;

        let position = self
            .update(instrument, |state| {
                let next = state.position.after_fill(side, price, size)?;
                state.position = next.clone();
                Some(next)
            })
            .ok_or_else(|| {
                QuoterError::Overflow {
                    instrument: instrument.clone(),
                    operation: "apply_fill",
                }
                .rejected()
            })?;

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
        self.read(instrument, |state| state.position.volume)
            .unwrap_or(Decimal::ZERO)
    }

    /// Average entry price, zero for unknown instruments.
    pub fn avg_price(&self, instrument: &InstrumentKey) -> Price {
        self.read(instrument, |state| Price::new(state.position.avg_price))
            .unwrap_or(Price::ZERO)
    }

    /// Current annualized volatility without observing a new price.
    pub fn volatility(&self, instrument: &InstrumentKey) -> f64 {
        self.read(instrument, |state| self.params.realized(&state.history))
            .unwrap_or(self.params.default_volatility)
    }

    /// Retained price history, oldest first.
    pub fn history(&self, instrument: &InstrumentKey) -> Vec<Price> {
        self.read(instrument, |state| state.history.prices())
            .unwrap_or_default()
    }

    /// Every instrument with state, sorted.
    pub fn instruments(&self) -> Vec<InstrumentKey> {
        let mut keys: Vec<InstrumentKey> =
            self.instruments.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Return one instrument to its virgin state.
    ///
    /// Operations already holding the slot finish before the reset; those
    /// waiting on it run against a fresh slot afterwards.
    pub fn reset(&self, instrument: &InstrumentKey) {
        if let Some(slot) = self.existing(instrument) {
            let mut state = slot.lock();
            state.retired = true;
            self.instruments
                .remove_if(instrument, |_, current| Arc::ptr_eq(current, &slot));
        }
        debug!(instrument = %instrument, "Instrument reset");
    }
}

impl Default for SharedQuoteEngine {
    fn default() -> Self {
        let config = QuoterConfig::default();
        Self {
            params: VolatilityParams::from_config(&config),
            instruments: DashMap::new(),
            config,
        }
    }
}
