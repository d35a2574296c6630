//! Drives a `QuoteEngine` from a JSON-lines event stream.

use std::io::{BufRead, Write};

use skew_mm::{QuoteEngine, QuoterConfig};
use tracing::{debug, info, warn};

use crate::error::{ReplayError, ReplayResult};
use crate::event::{PositionSummary, QuoteLine, ReplayEvent};

/// Counters for one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub prices: u64,
    pub fills: u64,
    /// Events the engine refused (bad price, negative volume).
    pub rejected: u64,
}

#[derive(Debug)]
pub struct Replayer {
    engine: QuoteEngine,
    stats: ReplayStats,
}

impl Replayer {
    pub fn new(config: QuoterConfig) -> ReplayResult<Self> {
        Ok(Self {
            engine: QuoteEngine::new(config)?,
            stats: ReplayStats::default(),
        })
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Apply one event, writing a quote line to `output` for price events.
    ///
    /// Engine rejections are counted and skipped; only I/O and encoding
    /// failures abort.
    pub fn apply<W: Write>(&mut self, event: &ReplayEvent, output: &mut W) -> ReplayResult<()> {
        match event {
            ReplayEvent::Price { instrument, price } => match self.engine.quote(instrument, *price)
            {
                Ok(quote) => {
                    self.stats.prices += 1;
                    let line = QuoteLine {
                        instrument,
                        price: *price,
                        quote: &quote,
                    };
                    serde_json::to_writer(&mut *output, &line)?;
                    output.write_all(b"\n")?;
                }
                Err(e) => {
                    self.stats.rejected += 1;
                    debug!(error = %e, "Skipping price event");
                }
            },
            ReplayEvent::Fill {
                instrument,
                volume,
                price,
                side,
            } => match self.engine.apply_fill(instrument, *volume, *price, *side) {
                Ok(()) => self.stats.fills += 1,
                Err(e) => {
                    self.stats.rejected += 1;
                    debug!(error = %e, "Skipping fill event");
                }
            },
        }
        Ok(())
    }

    /// Replay every line of `input`. Blank lines are ignored; a malformed
    /// line aborts with its 1-based line number.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
    ) -> ReplayResult<ReplayStats> {
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let event: ReplayEvent = serde_json::from_str(trimmed).map_err(|source| {
                ReplayError::Parse {
                    line: idx + 1,
                    source,
                }
            })?;
            self.apply(&event, &mut output)?;
        }
        output.flush()?;

        if self.stats.rejected > 0 {
            warn!(rejected = self.stats.rejected, "Some events were rejected");
        }
        Ok(self.stats)
    }

    /// Final state of every instrument seen, sorted by key.
    pub fn summary(&self) -> Vec<PositionSummary> {
        self.engine
            .instruments()
            .into_iter()
            .map(|instrument| {
                let fill_count = self
                    .engine
                    .position_state(&instrument)
                    .map_or(0, |p| p.fill_count);
                PositionSummary {
                    position: self.engine.position(&instrument),
                    avg_price: self.engine.avg_price(&instrument),
                    volatility: self.engine.volatility(&instrument),
                    fill_count,
                    instrument,
                }
            })
            .collect()
    }

    pub fn log_summary(&self) {
        for s in self.summary() {
            info!(
                instrument = %s.instrument,
                position = %s.position,
                avg_price = %s.avg_price,
                volatility = s.volatility,
                fills = s.fill_count,
                "Final position"
            );
        }
        info!(
            prices = self.stats.prices,
            fills = self.stats.fills,
            rejected = self.stats.rejected,
            "Replay complete"
        );
    }
}
