// =============================================================================
// Relative Strength Index (RSI) - simple trailing window
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes.
//
// Step 1 - Take the last `period` deltas between consecutive prices.
// Step 2 - avg_gain = sum(positive deltas) / period
//          avg_loss = sum(|negative deltas|) / period
// Step 3 - RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// No Wilder smoothing: every call looks at the trailing window only, so the
// value depends on nothing older than `period + 1` prices.
// =============================================================================

/// Default look-back.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI over the most recent `period` price-to-price deltas of `prices`.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `prices.len() < period + 1` => `None`
/// - Average loss of exactly zero (including a flat window) => 100.0
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let window = &prices[prices.len() - period - 1..];
    let (gains, losses) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l - delta)
        }
    });

    let period_f = period as f64;
    let avg_gain = gains / period_f;
    let avg_loss = losses / period_f;

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
