//! Exercises the exported C functions the way a foreign host would.

use std::ffi::CString;
use std::ptr;

use skew_ffi::*;

fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

#[test]
fn test_create_quote_destroy() {
    let engine = skew_engine_create();
    assert!(!engine.is_null());
    let aapl = cstr("AAPL");
    let mut quote = SkewQuote::default();

    unsafe {
        assert_eq!(skew_quote(engine, aapl.as_ptr(), 100.0, &mut quote), SKEW_OK);
        skew_engine_destroy(engine);
    }
    assert!((quote.bid - 98.0).abs() < 1e-9);
    assert!((quote.offer - 102.0).abs() < 1e-9);
    assert_eq!(quote.volatility, 1.0);
}

#[test]
fn test_fill_then_getters() {
    let engine = skew_engine_create();
    let aapl = cstr("AAPL");
    let mut position = f64::NAN;
    let mut avg = f64::NAN;
    let mut vol = f64::NAN;

    unsafe {
        assert_eq!(skew_apply_fill(engine, aapl.as_ptr(), 10.0, 100.0, true), SKEW_OK);
        assert_eq!(skew_apply_fill(engine, aapl.as_ptr(), 10.0, 110.0, true), SKEW_OK);
        assert_eq!(skew_get_position(engine, aapl.as_ptr(), &mut position), SKEW_OK);
        assert_eq!(skew_get_avg_price(engine, aapl.as_ptr(), &mut avg), SKEW_OK);
        assert_eq!(skew_get_volatility(engine, aapl.as_ptr(), &mut vol), SKEW_OK);
        skew_engine_destroy(engine);
    }
    assert_eq!(position, 20.0);
    assert!((avg - 105.0).abs() < 1e-9);
    assert_eq!(vol, 1.0);
}

#[test]
fn test_long_inventory_skews_quote() {
    let engine = skew_engine_create();
    let es = cstr("ES");
    let mut quote = SkewQuote::default();

    unsafe {
        assert_eq!(skew_apply_fill(engine, es.as_ptr(), 5.0, 100.0, true), SKEW_OK);
        assert_eq!(skew_quote(engine, es.as_ptr(), 100.0, &mut quote), SKEW_OK);
        skew_engine_destroy(engine);
    }
    // Long at default vol 1.0: 1% bid side, 7% offer side
    assert!((quote.bid - 99.0).abs() < 1e-9);
    assert!((quote.offer - 107.0).abs() < 1e-9);
}

#[test]
fn test_unknown_instrument_defaults() {
    let engine = skew_engine_create();
    let xyz = cstr("XYZ");
    let mut position = f64::NAN;
    let mut avg = f64::NAN;
    let mut vol = f64::NAN;

    unsafe {
        assert_eq!(skew_get_position(engine, xyz.as_ptr(), &mut position), SKEW_OK);
        assert_eq!(skew_get_avg_price(engine, xyz.as_ptr(), &mut avg), SKEW_OK);
        assert_eq!(skew_get_volatility(engine, xyz.as_ptr(), &mut vol), SKEW_OK);
        skew_engine_destroy(engine);
    }
    assert_eq!(position, 0.0);
    assert_eq!(avg, 0.0);
    assert_eq!(vol, 1.0);
}

#[test]
fn test_rejections_leave_state_untouched() {
    let engine = skew_engine_create();
    let aapl = cstr("AAPL");
    let mut quote = SkewQuote {
        bid: -1.0,
        offer: -1.0,
        volatility: -1.0,
    };
    let mut position = f64::NAN;

    unsafe {
        assert_eq!(skew_quote(engine, aapl.as_ptr(), 0.0, &mut quote), SKEW_ERR_PRICE);
        assert_eq!(skew_quote(engine, aapl.as_ptr(), -5.0, &mut quote), SKEW_ERR_PRICE);
        assert_eq!(skew_quote(engine, aapl.as_ptr(), f64::NAN, &mut quote), SKEW_ERR_PRICE);
        assert_eq!(
            skew_apply_fill(engine, aapl.as_ptr(), -1.0, 100.0, true),
            SKEW_ERR_VOLUME
        );
        assert_eq!(
            skew_apply_fill(engine, aapl.as_ptr(), 1.0, 0.0, true),
            SKEW_ERR_PRICE
        );
        assert_eq!(skew_get_position(engine, aapl.as_ptr(), &mut position), SKEW_OK);
        skew_engine_destroy(engine);
    }
    assert_eq!(quote.bid, -1.0);
    assert_eq!(position, 0.0);
}

#[test]
fn test_overflowing_quote_returns_status() {
    let engine = skew_engine_create();
    let big = cstr("BIG");
    let mut quote = SkewQuote::default();

    unsafe {
        assert_eq!(skew_apply_fill(engine, big.as_ptr(), 5.0, 100.0, true), SKEW_OK);
        assert_eq!(
            skew_quote(engine, big.as_ptr(), 7.5e28, &mut quote),
            SKEW_ERR_OVERFLOW
        );
        assert_eq!(quote, SkewQuote::default());
        assert_eq!(skew_quote(engine, big.as_ptr(), 100.0, &mut quote), SKEW_OK);
        skew_engine_destroy(engine);
    }
    assert!(quote.bid > 0.0);
}

#[test]
fn test_null_and_invalid_arguments() {
    let engine = skew_engine_create();
    let aapl = cstr("AAPL");
    let blank = cstr("   ");
    let not_utf8 = CString::new(vec![0xff, 0xfe]).unwrap();
    let mut quote = SkewQuote::default();
    let mut out = 0.0;

    unsafe {
        assert_eq!(
            skew_quote(ptr::null_mut(), aapl.as_ptr(), 100.0, &mut quote),
            SKEW_ERR_NULL
        );
        assert_eq!(skew_quote(engine, ptr::null(), 100.0, &mut quote), SKEW_ERR_NULL);
        assert_eq!(
            skew_quote(engine, aapl.as_ptr(), 100.0, ptr::null_mut()),
            SKEW_ERR_NULL
        );
        assert_eq!(
            skew_get_position(engine, aapl.as_ptr(), ptr::null_mut()),
            SKEW_ERR_NULL
        );
        assert_eq!(
            skew_apply_fill(ptr::null_mut(), aapl.as_ptr(), 1.0, 100.0, true),
            SKEW_ERR_NULL
        );
        assert_eq!(
            skew_quote(engine, blank.as_ptr(), 100.0, &mut quote),
            SKEW_ERR_INSTRUMENT
        );
        assert_eq!(
            skew_get_volatility(engine, not_utf8.as_ptr(), &mut out),
            SKEW_ERR_INSTRUMENT
        );

        skew_engine_destroy(engine);
        skew_engine_destroy(ptr::null_mut());
    }
}

#[test]
fn test_create_with_config() {
    let config = cstr("flat_half_spread = \"0.03\"\nhistory_window = 5\n");
    let invalid = cstr("history_window = 1\n");
    let garbage = cstr("history_window = [");
    let aapl = cstr("AAPL");
    let mut quote = SkewQuote::default();

    unsafe {
        assert!(skew_engine_create_with_config(ptr::null()).is_null());
        assert!(skew_engine_create_with_config(invalid.as_ptr()).is_null());
        assert!(skew_engine_create_with_config(garbage.as_ptr()).is_null());

        let engine = skew_engine_create_with_config(config.as_ptr());
        assert!(!engine.is_null());
        assert_eq!(skew_quote(engine, aapl.as_ptr(), 100.0, &mut quote), SKEW_OK);
        skew_engine_destroy(engine);
    }
    assert!((quote.bid - 97.0).abs() < 1e-9);
    assert!((quote.offer - 103.0).abs() < 1e-9);
}
