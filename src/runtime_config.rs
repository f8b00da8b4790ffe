// =============================================================================
// Runtime Configuration - engine settings and collaborator endpoints
// =============================================================================
//
// Every tunable parameter lives here.  All fields carry `#[serde(default)]`
// so that a partial (or empty) JSON file still loads, and adding new fields
// never breaks loading an older config file.
//
// Indicator settings are read once when the engine is built and are not
// changed afterwards.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::change::MAX_CHANGE_WINDOW_SECS;
use crate::signals::SignalThresholds;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_ema_fast_period() -> usize {
    9
}

fn default_ema_slow_period() -> usize {
    21
}

fn default_rsi_period() -> usize {
    crate::indicators::rsi::DEFAULT_RSI_PERIOD
}

fn default_volatility_lookback() -> usize {
    crate::indicators::volatility::DEFAULT_VOLATILITY_LOOKBACK
}

fn default_history_capacity() -> usize {
    crate::market_data::history_buffer::DEFAULT_CAPACITY
}

fn default_change_window_secs() -> i64 {
    crate::indicators::change::DEFAULT_CHANGE_WINDOW_SECS
}

fn default_from_currency() -> String {
    "XAU".to_string()
}

fn default_to_currency() -> String {
    "USD".to_string()
}

fn default_price_api_url() -> String {
    "https://www.alphavantage.co/query".to_string()
}

fn default_news_max_items() -> usize {
    10
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_news_interval_secs() -> u64 {
    300
}

fn default_signal_history_len() -> usize {
    20
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Indicator and decision parameters for one [`IndicatorEngine`].
///
/// [`IndicatorEngine`]: crate::engine::IndicatorEngine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_ema_fast_period")]
    pub ema_fast_period: usize,

    #[serde(default = "default_ema_slow_period")]
    pub ema_slow_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Number of most recent ticks in the high-low range.
    #[serde(default = "default_volatility_lookback")]
    pub volatility_lookback: usize,

    /// Maximum ticks kept in the history buffer.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Trailing window for the 1-minute change, in seconds.
    #[serde(default = "default_change_window_secs")]
    pub change_window_secs: i64,

    #[serde(default)]
    pub thresholds: SignalThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ema_fast_period: default_ema_fast_period(),
            ema_slow_period: default_ema_slow_period(),
            rsi_period: default_rsi_period(),
            volatility_lookback: default_volatility_lookback(),
            history_capacity: default_history_capacity(),
            change_window_secs: default_change_window_secs(),
            thresholds: SignalThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Trailing change window.  Saturates instead of panicking when the
    /// configured seconds exceed what `chrono::Duration` can hold.
    pub fn change_window(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.change_window_secs).unwrap_or(chrono::Duration::MAX)
    }

    /// Reject settings that would leave an indicator permanently absent or
    /// the decision rules unreachable.
    pub fn validate(&self) -> Result<()> {
        if self.ema_fast_period == 0 || self.ema_slow_period == 0 {
            bail!("EMA periods must be at least 1");
        }
        if self.rsi_period == 0 {
            bail!("rsi_period must be at least 1");
        }
        if self.volatility_lookback == 0 {
            bail!("volatility_lookback must be at least 1");
        }
        if self.history_capacity <= self.rsi_period
            || self.history_capacity < self.volatility_lookback
        {
            bail!(
                "history_capacity {} is too small for rsi_period {} / volatility_lookback {}",
                self.history_capacity,
                self.rsi_period,
                self.volatility_lookback
            );
        }
        if self.change_window_secs <= 0 || self.change_window_secs > MAX_CHANGE_WINDOW_SECS {
            bail!(
                "change_window_secs {} must be between 1 and {}",
                self.change_window_secs,
                MAX_CHANGE_WINDOW_SECS
            );
        }
        let t = &self.thresholds;
        if ![t.buy_rsi_min, t.buy_rsi_max, t.sell_rsi_max, t.momentum_boundary]
            .iter()
            .all(|v| v.is_finite())
        {
            bail!("signal thresholds must be finite");
        }
        if t.buy_rsi_min >= t.buy_rsi_max {
            bail!(
                "buy_rsi_min {} must be below buy_rsi_max {}",
                t.buy_rsi_min,
                t.buy_rsi_max
            );
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Engine -------------------------------------------------------------

    #[serde(default)]
    pub engine: EngineConfig,

    // --- Price source -------------------------------------------------------

    #[serde(default = "default_from_currency")]
    pub from_currency: String,

    #[serde(default = "default_to_currency")]
    pub to_currency: String,

    /// Alpha Vantage query endpoint.
    #[serde(default = "default_price_api_url")]
    pub price_api_url: String,

    /// Empty disables price polling.
    #[serde(default)]
    pub price_api_key: String,

    /// Milliseconds between price polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    // --- News ---------------------------------------------------------------

    /// Empty disables news polling.
    #[serde(default)]
    pub news_api_url: String,

    #[serde(default = "default_news_max_items")]
    pub news_max_items: usize,

    #[serde(default = "default_news_interval_secs")]
    pub news_interval_secs: u64,

    // --- Dashboard ----------------------------------------------------------

    /// Number of past signals kept for the dashboard.
    #[serde(default = "default_signal_history_len")]
    pub signal_history_len: usize,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            from_currency: default_from_currency(),
            to_currency: default_to_currency(),
            price_api_url: default_price_api_url(),
            price_api_key: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
            news_api_url: String::new(),
            news_max_items: default_news_max_items(),
            news_interval_secs: default_news_interval_secs(),
            signal_history_len: default_signal_history_len(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            pair = %config.pair(),
            poll_interval_ms = config.poll_interval_ms,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `SCALPER_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("SCALPER_PRICE_API_KEY") {
            self.price_api_key = key.trim().to_string();
        }
        if let Some(url) = lookup("SCALPER_NEWS_API_URL") {
            self.news_api_url = url.trim().to_string();
        }
        if let Some(addr) = lookup("SCALPER_BIND_ADDR") {
            self.bind_addr = addr.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate().context("invalid engine config")?;
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be positive");
        }
        if self.news_interval_secs == 0 {
            bail!("news_interval_secs must be positive");
        }
        Ok(())
    }

    /// Instrument label, e.g. `XAU/USD`.
    pub fn pair(&self) -> String {
        format!("{}/{}", self.from_currency, self.to_currency)
    }
}
