//! `extern "C"` surface.
//!
//! Every call that can fail returns an `i32` status and writes its result
//! through an out-pointer. Out-pointers are left untouched on failure.
//! Instrument keys are NUL-terminated UTF-8 strings.

use std::ffi::{c_char, CStr};

use skew_core::CoreError;
use skew_mm::{QuoteEngine, QuoterConfig, QuoterError, QuoterResult};
use tracing::{debug, warn};

use crate::boundary;

pub const SKEW_OK: i32 = 0;
pub const SKEW_ERR_NULL: i32 = -1;
pub const SKEW_ERR_INSTRUMENT: i32 = -2;
pub const SKEW_ERR_PRICE: i32 = -3;
pub const SKEW_ERR_VOLUME: i32 = -4;
pub const SKEW_ERR_CONFIG: i32 = -5;
pub const SKEW_ERR_OVERFLOW: i32 = -6;

/// Opaque engine handle handed to foreign callers.
pub struct SkewEngine {
    inner: QuoteEngine,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkewQuote {
    pub bid: f64,
    pub offer: f64,
    pub volatility: f64,
}

fn status_of(err: &QuoterError) -> i32 {
    match err.reason() {
        "invalid_price" => SKEW_ERR_PRICE,
        "negative_volume" => SKEW_ERR_VOLUME,
        "invalid_instrument" => SKEW_ERR_INSTRUMENT,
        "overflow" => SKEW_ERR_OVERFLOW,
        _ => SKEW_ERR_CONFIG,
    }
}

/// Borrows the instrument string, mapping null and non-UTF-8 to statuses.
///
/// # Safety
/// `instrument` must be null or point to a NUL-terminated string.
unsafe fn instrument_arg<'a>(instrument: *const c_char) -> Result<&'a str, i32> {
    if instrument.is_null() {
        return Err(SKEW_ERR_NULL);
    }
    CStr::from_ptr(instrument).to_str().map_err(|e| {
        reject(QuoterError::from(CoreError::InvalidInstrument(e.to_string())).rejected())
    })
}

fn reject(err: QuoterError) -> i32 {
    let status = status_of(&err);
    debug!(reason = err.reason(), status, "Foreign call rejected");
    status
}

/// # Safety
/// `out` must be non-null and valid for writes.
unsafe fn finish<T>(result: QuoterResult<T>, out: *mut T) -> i32 {
    match result {
        Ok(value) => {
            out.write(value);
            SKEW_OK
        }
        Err(e) => reject(e),
    }
}

/// Installs the tracing subscriber. Returns `SKEW_ERR_CONFIG` if one is
/// already installed.
#[no_mangle]
pub extern "C" fn skew_init_logging() -> i32 {
    match skew_telemetry::init_logging() {
        Ok(()) => SKEW_OK,
        Err(_) => SKEW_ERR_CONFIG,
    }
}

/// Creates an engine with default configuration. Release with
/// [`skew_engine_destroy`].
#[no_mangle]
pub extern "C" fn skew_engine_create() -> *mut SkewEngine {
    Box::into_raw(Box::new(SkewEngine {
        inner: QuoteEngine::default(),
    }))
}

/// Creates an engine from TOML configuration text. Returns null when the
/// text is null, not UTF-8, or not a valid configuration.
///
/// # Safety
/// `config_toml` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn skew_engine_create_with_config(
    config_toml: *const c_char,
) -> *mut SkewEngine {
    if config_toml.is_null() {
        return std::ptr::null_mut();
    }
    let Ok(text) = CStr::from_ptr(config_toml).to_str() else {
        warn!("Config text is not UTF-8");
        return std::ptr::null_mut();
    };
    match QuoterConfig::from_toml_str(text).and_then(QuoteEngine::new) {
        Ok(inner) => Box::into_raw(Box::new(SkewEngine { inner })),
        Err(e) => {
            warn!(error = %e, "Rejected engine config");
            std::ptr::null_mut()
        }
    }
}

/// Releases an engine. Null is ignored.
///
/// # Safety
/// `engine` must be null or a handle from `skew_engine_create*` that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn skew_engine_destroy(engine: *mut SkewEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Records `price` for `instrument` and writes the resulting quote.
///
/// # Safety
/// `engine` must be a live handle, `instrument` a NUL-terminated string and
/// `out` valid for writes. Any of them may be null, which yields
/// `SKEW_ERR_NULL`.
#[no_mangle]
pub unsafe extern "C" fn skew_quote(
    engine: *mut SkewEngine,
    instrument: *const c_char,
    price: f64,
    out: *mut SkewQuote,
) -> i32 {
    if engine.is_null() || out.is_null() {
        return SKEW_ERR_NULL;
    }
    let instrument = match instrument_arg(instrument) {
        Ok(s) => s,
        Err(status) => return status,
    };
    let result = boundary::quote(&mut (*engine).inner, instrument, price).map(|q| SkewQuote {
        bid: q.bid,
        offer: q.offer,
        volatility: q.volatility,
    });
    finish(result, out)
}

/// Applies a fill of `volume` units at `price`.
///
/// # Safety
/// `engine` must be a live handle and `instrument` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn skew_apply_fill(
    engine: *mut SkewEngine,
    instrument: *const c_char,
    volume: f64,
    price: f64,
    is_buy: bool,
) -> i32 {
    if engine.is_null() {
        return SKEW_ERR_NULL;
    }
    let instrument = match instrument_arg(instrument) {
        Ok(s) => s,
        Err(status) => return status,
    };
    match boundary::apply_fill(&mut (*engine).inner, instrument, volume, price, is_buy) {
        Ok(()) => SKEW_OK,
        Err(e) => reject(e),
    }
}

unsafe fn read_with(
    engine: *const SkewEngine,
    instrument: *const c_char,
    out: *mut f64,
    read: fn(&QuoteEngine, &str) -> QuoterResult<f64>,
) -> i32 {
    if engine.is_null() || out.is_null() {
        return SKEW_ERR_NULL;
    }
    let instrument = match instrument_arg(instrument) {
        Ok(s) => s,
        Err(status) => return status,
    };
    finish(read(&(*engine).inner, instrument), out)
}

/// Writes the signed position for `instrument` (0 if unknown).
///
/// # Safety
/// Same pointer requirements as [`skew_quote`].
#[no_mangle]
pub unsafe extern "C" fn skew_get_position(
    engine: *const SkewEngine,
    instrument: *const c_char,
    out: *mut f64,
) -> i32 {
    read_with(engine, instrument, out, boundary::position)
}

/// Writes the average entry price for `instrument` (0 if unknown).
///
/// # Safety
/// Same pointer requirements as [`skew_quote`].
#[no_mangle]
pub unsafe extern "C" fn skew_get_avg_price(
    engine: *const SkewEngine,
    instrument: *const c_char,
    out: *mut f64,
) -> i32 {
    read_with(engine, instrument, out, boundary::avg_price)
}

/// Writes the current volatility for `instrument` (1.0 if unknown).
///
/// # Safety
/// Same pointer requirements as [`skew_quote`].
#[no_mangle]
pub unsafe extern "C" fn skew_get_volatility(
    engine: *const SkewEngine,
    instrument: *const c_char,
    out: *mut f64,
) -> i32 {
    read_with(engine, instrument, out, boundary::volatility)
}
