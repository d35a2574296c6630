//! Argument conversion shared by the C and Python surfaces.

use rust_decimal::prelude::ToPrimitive;
use skew_core::{InstrumentKey, OrderSide, Price, Size};
use skew_mm::{QuoteEngine, QuoterError, QuoterResult};

/// Quote converted back to plain floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatQuote {
    pub bid: f64,
    pub offer: f64,
    pub volatility: f64,
}

/// Lift a conversion failure into a counted rejection.
fn checked<T>(result: skew_core::Result<T>) -> QuoterResult<T> {
    result.map_err(|e| QuoterError::from(e).rejected())
}

fn key(instrument: &str) -> QuoterResult<InstrumentKey> {
    checked(InstrumentKey::parse(instrument))
}

pub fn quote(engine: &mut QuoteEngine, instrument: &str, price: f64) -> QuoterResult<FloatQuote> {
    let key = key(instrument)?;
    let price = checked(Price::try_from_f64(price))?;
    let quote = engine.quote(&key, price)?;
    Ok(FloatQuote {
        bid: quote.bid.to_f64(),
        offer: quote.offer.to_f64(),
        volatility: quote.volatility,
    })
}

pub fn apply_fill(
    engine: &mut QuoteEngine,
    instrument: &str,
    volume: f64,
    price: f64,
    is_buy: bool,
) -> QuoterResult<()> {
    let key = key(instrument)?;
    let size = checked(Size::try_from_f64(volume))?;
    let price = checked(Price::try_from_f64(price))?;
    engine.apply_fill(&key, size, price, OrderSide::from_is_buy(is_buy))
}

pub fn position(engine: &QuoteEngine, instrument: &str) -> QuoterResult<f64> {
    let key = key(instrument)?;
    Ok(engine.position(&key).to_f64().unwrap_or(0.0))
}

pub fn avg_price(engine: &QuoteEngine, instrument: &str) -> QuoterResult<f64> {
    let key = key(instrument)?;
    Ok(engine.avg_price(&key).to_f64())
}

pub fn volatility(engine: &QuoteEngine, instrument: &str) -> QuoterResult<f64> {
    let key = key(instrument)?;
    Ok(engine.volatility(&key))
}
