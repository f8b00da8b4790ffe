// =============================================================================
// Trailing Change - percentage move over a wall-clock window
// =============================================================================
//
// Like a rate of change, but anchored on tick time instead of tick count:
//   CHANGE = (latest - anchor) / anchor * 100
//
// The anchor is the most recent tick that is at least `window` older than the
// latest tick.  Until the buffer spans a full window the oldest stored tick is
// used instead, so the value is available from the second tick onwards.
// =============================================================================

use chrono::Duration;

use crate::types::PriceTick;

/// Default trailing window in seconds.
pub const DEFAULT_CHANGE_WINDOW_SECS: i64 = 60;

/// Largest window accepted from configuration (one day).
pub const MAX_CHANGE_WINDOW_SECS: i64 = 86_400;

/// Returns `None` with fewer than two ticks or a zero-priced anchor.
///
/// A window reaching past the representable time range matches no tick, so
/// the oldest one becomes the anchor.
pub fn trailing_change(ticks: &[PriceTick], window: Duration) -> Option<f64> {
    if ticks.len() < 2 {
        return None;
    }
    let latest = ticks.last()?;
    let cutoff = latest.time.checked_sub_signed(window);

    let anchor = cutoff
        .and_then(|cutoff| ticks.iter().rev().find(|t| t.time <= cutoff))
        .or_else(|| ticks.first())?;

    if anchor.price == 0.0 {
        return None;
    }
    Some((latest.price - anchor.price) / anchor.price * 100.0)
}
