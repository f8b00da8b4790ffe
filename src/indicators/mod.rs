// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the signal
// engine.  Every windowed function returns `Option<T>` so callers are forced
// to handle insufficient-data and numerical-edge-case scenarios.  The EMA
// pair is the one stateful piece and is owned by the engine.

pub mod change;
pub mod ema;
pub mod rsi;
pub mod volatility;

use chrono::Duration;
use serde::Serialize;

use crate::types::PriceTick;

pub use change::trailing_change;
pub use ema::{next_ema, Ema, EmaTracker};
pub use rsi::calculate_rsi;
pub use volatility::calculate_volatility;

/// Windowed indicator values for one evaluation.  `None` means not enough
/// history (or a degenerate denominator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub volatility: Option<f64>,
    pub change_1m: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn compute(
        ticks: &[PriceTick],
        rsi_period: usize,
        volatility_lookback: usize,
        change_window: Duration,
    ) -> Self {
        let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
        Self {
            rsi: calculate_rsi(&prices, rsi_period),
            volatility: calculate_volatility(&prices, volatility_lookback),
            change_1m: trailing_change(ticks, change_window),
        }
    }
}
