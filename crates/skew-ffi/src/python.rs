//! Python bindings via PyO3.
//!
//! Build with `--features python`; the extension module is importable as
//! `skew_ffi`.

use pyo3::exceptions::{PyOverflowError, PyValueError};
use pyo3::prelude::*;
use skew_mm::{QuoteEngine, QuoterConfig, QuoterError};

use crate::boundary::{self, FloatQuote};

fn to_py_err(err: QuoterError) -> PyErr {
    match err {
        QuoterError::Overflow { .. } => PyOverflowError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Python wrapper for a two-sided quote
#[pyclass(name = "Quote", frozen)]
#[derive(Clone)]
pub struct PyQuote {
    #[pyo3(get)]
    pub bid: f64,
    #[pyo3(get)]
    pub offer: f64,
    #[pyo3(get)]
    pub volatility: f64,
}

#[pymethods]
impl PyQuote {
    /// Offer minus bid
    #[getter]
    fn spread(&self) -> f64 {
        self.offer - self.bid
    }

    fn __repr__(&self) -> String {
        format!(
            "Quote(bid={:.6}, offer={:.6}, volatility={:.4})",
            self.bid, self.offer, self.volatility
        )
    }
}

impl From<FloatQuote> for PyQuote {
    fn from(q: FloatQuote) -> Self {
        PyQuote {
            bid: q.bid,
            offer: q.offer,
            volatility: q.volatility,
        }
    }
}

/// Python wrapper for the quote engine
#[pyclass(name = "QuoteEngine")]
pub struct PyQuoteEngine {
    inner: QuoteEngine,
}

#[pymethods]
impl PyQuoteEngine {
    /// Create an engine, optionally from TOML configuration text.
    #[new]
    #[pyo3(signature = (config_toml=None))]
    fn new(config_toml: Option<&str>) -> PyResult<Self> {
        let inner = match config_toml {
            Some(text) => QuoterConfig::from_toml_str(text)
                .and_then(QuoteEngine::new)
                .map_err(to_py_err)?,
            None => QuoteEngine::default(),
        };
        Ok(Self { inner })
    }

    fn quote(&mut self, instrument: &str, price: f64) -> PyResult<PyQuote> {
        boundary::quote(&mut self.inner, instrument, price)
            .map(PyQuote::from)
            .map_err(to_py_err)
    }

    #[pyo3(signature = (instrument, volume, price, is_buy))]
    fn apply_fill(
        &mut self,
        instrument: &str,
        volume: f64,
        price: f64,
        is_buy: bool,
    ) -> PyResult<()> {
        boundary::apply_fill(&mut self.inner, instrument, volume, price, is_buy)
            .map_err(to_py_err)
    }

    fn get_position(&self, instrument: &str) -> PyResult<f64> {
        boundary::position(&self.inner, instrument).map_err(to_py_err)
    }

    fn get_avg_price(&self, instrument: &str) -> PyResult<f64> {
        boundary::avg_price(&self.inner, instrument).map_err(to_py_err)
    }

    fn get_volatility(&self, instrument: &str) -> PyResult<f64> {
        boundary::volatility(&self.inner, instrument).map_err(to_py_err)
    }

    /// Instruments with any recorded state, sorted.
    fn instruments(&self) -> Vec<String> {
        self.inner
            .instruments()
            .into_iter()
            .map(|key| key.as_str().to_string())
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "QuoteEngine(instruments={})",
            self.inner.instruments().len()
        )
    }
}

#[pymodule]
fn skew_ffi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyQuote>()?;
    m.add_class::<PyQuoteEngine>()?;
    Ok(())
}
