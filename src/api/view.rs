// =============================================================================
// Dashboard View - display strings for the latest signal
// =============================================================================
//
// Formatting only.  Placeholders are "--" for every value the engine could
// not compute yet.

use serde::Serialize;

use crate::engine::SignalResult;

const PLACEHOLDER: &str = "--";

/// Colour hint for the 1-minute change chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipTone {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayStrings {
    pub signal: String,
    pub price: String,
    pub ema_fast: String,
    pub ema_slow: String,
    pub rsi: String,
    pub volatility: String,
    pub change_label: String,
    pub change_tone: ChipTone,
}

/// Payload of `GET /api/v1/signal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub pair: String,
    pub latest: Option<SignalResult>,
    pub display: DisplayStrings,
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.decimals$}"))
}

impl DisplayStrings {
    pub fn from_result(result: Option<&SignalResult>) -> Self {
        let change = result.and_then(|r| r.indicators.change_1m);
        let (change_label, change_tone) = match change {
            Some(c) => {
                let tone = if c > 0.0 {
                    ChipTone::Up
                } else if c < 0.0 {
                    ChipTone::Down
                } else {
                    ChipTone::Neutral
                };
                (format!("1m: {c:.2}%"), tone)
            }
            None => (format!("1m: {PLACEHOLDER}"), ChipTone::Neutral),
        };

        Self {
            signal: result.map_or_else(|| PLACEHOLDER.to_string(), |r| r.signal.to_string()),
            price: fixed(result.and_then(|r| r.price), 2),
            ema_fast: fixed(result.and_then(|r| r.ema_fast), 2),
            ema_slow: fixed(result.and_then(|r| r.ema_slow), 2),
            rsi: fixed(result.and_then(|r| r.indicators.rsi), 1),
            volatility: result
                .and_then(|r| r.indicators.volatility)
                .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.2}%")),
            change_label,
            change_tone,
        }
    }
}

impl DashboardView {
    pub fn new(pair: String, latest: Option<SignalResult>) -> Self {
        let display = DisplayStrings::from_result(latest.as_ref());
        Self {
            pair,
            latest,
            display,
        }
    }
}
