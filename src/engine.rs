// =============================================================================
// Indicator Engine - one instrument, one tick at a time
// =============================================================================
//
// Owns the price history and the EMA pair.  Each accepted tick is appended,
// fed to both EMAs, and then the windowed indicators are recomputed over the
// buffer before classification.  Rejected ticks leave all state untouched.
//
// The engine is plain synchronous data: `evaluate` takes `&mut self`, so a
// caller sharing it across tasks must serialise access itself.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::indicators::{EmaTracker, IndicatorSnapshot};
use crate::market_data::{HistoryBuffer, TickRejection};
use crate::runtime_config::EngineConfig;
use crate::signals::{classify, ClassifierInputs, Verdict};
use crate::types::{PriceTick, Signal};

/// Outcome of one evaluation, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub signal: Signal,
    pub verdict: Verdict,
    pub trend: &'static str,
    pub reason: &'static str,
    #[serde(flatten)]
    pub indicators: IndicatorSnapshot,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    /// Latest stored tick.
    pub time: Option<DateTime<Utc>>,
    pub price: Option<f64>,
}

/// Streaming indicator and signal engine for a single instrument.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: EngineConfig,
    history: HistoryBuffer,
    emas: EmaTracker,
}

impl IndicatorEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            history: HistoryBuffer::new(config.history_capacity),
            emas: EmaTracker::new(config.ema_fast_period, config.ema_slow_period),
            config,
        }
    }

    /// Ingest `tick` and classify.  A malformed, stale or repeated tick is
    /// dropped and the result for the unchanged state is returned instead.
    pub fn evaluate(&mut self, tick: PriceTick) -> SignalResult {
        match self.try_evaluate(tick) {
            Ok(result) => result,
            Err(rejection) => {
                debug!(%rejection, price = tick.price, time = %tick.time, "tick dropped");
                self.current()
            }
        }
    }

    /// Like [`evaluate`](Self::evaluate) but reports why a tick was refused.
    pub fn try_evaluate(&mut self, tick: PriceTick) -> Result<SignalResult, TickRejection> {
        self.history.append(tick)?;
        self.emas.update(tick.price);
        Ok(self.current())
    }

    /// Classify the current state without ingesting anything.
    pub fn current(&self) -> SignalResult {
        let indicators = IndicatorSnapshot::compute(
            self.history.snapshot(),
            self.config.rsi_period,
            self.config.volatility_lookback,
            self.config.change_window(),
        );

        let inputs = ClassifierInputs {
            ema_fast: self.emas.fast(),
            ema_slow: self.emas.slow(),
            rsi: indicators.rsi,
            change_1m: indicators.change_1m,
        };
        let verdict = classify(&inputs, &self.config.thresholds);
        let last = self.history.last();

        SignalResult {
            signal: verdict.signal(),
            verdict,
            trend: verdict.trend(),
            reason: verdict.reason(),
            indicators,
            ema_fast: inputs.ema_fast,
            ema_slow: inputs.ema_slow,
            time: last.map(|t| t.time),
            price: last.map(|t| t.price),
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn ema_fast(&self) -> Option<f64> {
        self.emas.fast()
    }

    pub fn ema_slow(&self) -> Option<f64> {
        self.emas.slow()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
