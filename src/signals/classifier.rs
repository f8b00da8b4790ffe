// =============================================================================
// Signal Classifier - EMA cross + RSI zone + 1-minute momentum
// =============================================================================
//
// Rules, first match wins:
//   1. BUY   fast > slow, buy_rsi_min < RSI < buy_rsi_max, change > boundary
//   2. SELL  fast < slow, RSI < sell_rsi_max,               change < boundary
//   3. WAIT  everything else; the trend label only reflects the EMA relation
//
// Missing EMAs short-circuit to WAIT before any rule is looked at.  A missing
// RSI or change value simply fails the rule that needs it.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::Signal;

fn default_buy_rsi_min() -> f64 {
    40.0
}

fn default_buy_rsi_max() -> f64 {
    70.0
}

fn default_sell_rsi_max() -> f64 {
    60.0
}

fn default_momentum_boundary() -> f64 {
    0.0
}

/// Decision thresholds.  All comparisons against them are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Lower bound of the RSI band that allows a BUY.
    #[serde(default = "default_buy_rsi_min")]
    pub buy_rsi_min: f64,

    /// Upper bound of the RSI band that allows a BUY.
    #[serde(default = "default_buy_rsi_max")]
    pub buy_rsi_max: f64,

    /// RSI must be below this for a SELL.
    #[serde(default = "default_sell_rsi_max")]
    pub sell_rsi_max: f64,

    /// 1-minute change (percent) must be above this for BUY and below it for
    /// SELL.
    #[serde(default = "default_momentum_boundary")]
    pub momentum_boundary: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            buy_rsi_min: default_buy_rsi_min(),
            buy_rsi_max: default_buy_rsi_max(),
            sell_rsi_max: default_sell_rsi_max(),
            momentum_boundary: default_momentum_boundary(),
        }
    }
}

/// Direction of the fast EMA relative to the slow one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Up,
    Down,
    Flat,
}

impl Bias {
    fn from_emas(fast: f64, slow: f64) -> Self {
        if fast > slow {
            Self::Up
        } else if fast < slow {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Which branch of the decision rules produced the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "bias", rename_all = "snake_case")]
pub enum Verdict {
    CollectingData,
    BullishContinuation,
    BearishContinuation,
    Mixed(Bias),
}

pub const TREND_COLLECTING: &str = "Collecting data…";
pub const TREND_BULLISH: &str = "Short-term bullish bias";
pub const TREND_BEARISH: &str = "Short-term bearish bias";
pub const TREND_UP_WEAK: &str = "Up bias but conditions not strong enough.";
pub const TREND_DOWN_WEAK: &str = "Down bias but conditions not strong enough.";
pub const TREND_NONE: &str = "No clear trend yet.";

pub const REASON_COLLECTING: &str = "Need more price history to build EMAs and RSI.";
pub const REASON_BUY: &str = "Fast EMA above slow EMA, RSI in healthy zone, and 1-minute change \
     positive. Possible scalp buy continuation.";
pub const REASON_SELL: &str = "Fast EMA below slow EMA, RSI not oversold, and 1-minute change \
     negative. Possible scalp sell continuation.";
pub const REASON_MIXED: &str =
    "Indicators are mixed or conflicting. Waiting to avoid chasing random noise.";

impl Verdict {
    pub fn signal(self) -> Signal {
        match self {
            Self::BullishContinuation => Signal::Buy,
            Self::BearishContinuation => Signal::Sell,
            Self::CollectingData | Self::Mixed(_) => Signal::Wait,
        }
    }

    pub fn trend(self) -> &'static str {
        match self {
            Self::CollectingData => TREND_COLLECTING,
            Self::BullishContinuation => TREND_BULLISH,
            Self::BearishContinuation => TREND_BEARISH,
            Self::Mixed(Bias::Up) => TREND_UP_WEAK,
            Self::Mixed(Bias::Down) => TREND_DOWN_WEAK,
            Self::Mixed(Bias::Flat) => TREND_NONE,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::CollectingData => REASON_COLLECTING,
            Self::BullishContinuation => REASON_BUY,
            Self::BearishContinuation => REASON_SELL,
            Self::Mixed(_) => REASON_MIXED,
        }
    }
}

/// Indicator values the rules look at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierInputs {
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub change_1m: Option<f64>,
}

/// Apply the decision rules.  Pure; holds no state between calls.
pub fn classify(inputs: &ClassifierInputs, thresholds: &SignalThresholds) -> Verdict {
    let (fast, slow) = match (inputs.ema_fast, inputs.ema_slow) {
        (Some(fast), Some(slow)) => (fast, slow),
        _ => return Verdict::CollectingData,
    };

    let bias = Bias::from_emas(fast, slow);

    let rsi_in_buy_zone = inputs
        .rsi
        .is_some_and(|r| r > thresholds.buy_rsi_min && r < thresholds.buy_rsi_max);
    let rising = inputs
        .change_1m
        .is_some_and(|c| c > thresholds.momentum_boundary);
    if bias == Bias::Up && rsi_in_buy_zone && rising {
        return Verdict::BullishContinuation;
    }

    let rsi_below_sell_cap = inputs.rsi.is_some_and(|r| r < thresholds.sell_rsi_max);
    let falling = inputs
        .change_1m
        .is_some_and(|c| c < thresholds.momentum_boundary);
    if bias == Bias::Down && rsi_below_sell_cap && falling {
        return Verdict::BearishContinuation;
    }

    Verdict::Mixed(bias)
}
