// =============================================================================
// Exponential Moving Average (EMA) - incremental form
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = price_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the first observed price.  Unlike a
// batch EMA over a closed candle series, the tracker here is fed one tick at a
// time and never re-reads history.
// =============================================================================

use serde::Serialize;

/// Advance an EMA by one observation.
///
/// `prev == None` means no observation has been seen yet; the result is then
/// `price` exactly.
pub fn next_ema(prev: Option<f64>, price: f64, period: usize) -> f64 {
    let multiplier = 2.0 / (period as f64 + 1.0);
    match prev {
        Some(prev) if prev.is_finite() => price * multiplier + prev * (1.0 - multiplier),
        _ => price,
    }
}

/// A single running EMA with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ema {
    period: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            value: None,
        }
    }

    pub fn update(&mut self, price: f64) -> f64 {
        let next = next_ema(self.value, price, self.period);
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Fast and slow EMA pair, always advanced together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaTracker {
    fast: Ema,
    slow: Ema,
}

impl EmaTracker {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
        }
    }

    /// Feed one price into both series and return `(fast, slow)`.
    pub fn update(&mut self, price: f64) -> (f64, f64) {
        (self.fast.update(price), self.slow.update(price))
    }

    pub fn fast(&self) -> Option<f64> {
        self.fast.value()
    }

    pub fn slow(&self) -> Option<f64> {
        self.slow.value()
    }
}

impl Default for EmaTracker {
    fn default() -> Self {
        Self::new(9, 21)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_update_seeds_with_price() {
        let mut ema = Ema::new(9);
        assert_eq!(ema.value(), None);
        assert_eq!(ema.update(2412.35), 2412.35);
        assert_eq!(ema.value(), Some(2412.35));
    }

    #[test]
    fn known_values() {
        // period 3 => multiplier 0.5
        let mut ema = Ema::new(3);
        ema.update(10.0);
        assert!((ema.update(20.0) - 15.0).abs() < 1e-12);
        assert!((ema.update(5.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn tracker_updates_both_series_independently() {
        let mut tracker = EmaTracker::new(9, 21);
        assert_eq!(tracker.fast(), None);
        assert_eq!(tracker.slow(), None);

        let (fast, slow) = tracker.update(100.0);
        assert_eq!((fast, slow), (100.0, 100.0));

        let (fast, slow) = tracker.update(110.0);
        assert!((fast - (110.0 * 0.2 + 100.0 * 0.8)).abs() < 1e-12);
        let k = 2.0 / 22.0;
        assert!((slow - (110.0 * k + 100.0 * (1.0 - k))).abs() < 1e-12);
        assert!(fast > slow, "shorter period reacts faster");
    }

    #[test]
    fn non_finite_previous_reseeds() {
        assert_eq!(next_ema(Some(f64::NAN), 42.0, 9), 42.0);
    }

    proptest! {
        #[test]
        fn update_lies_between_previous_and_price(
            prev in 0.01..1_000_000.0f64,
            price in 0.01..1_000_000.0f64,
            period in 1usize..500,
        ) {
            let next = next_ema(Some(prev), price, period);
            let lo = prev.min(price);
            let hi = prev.max(price);
            let tol = 1e-9 * hi;
            prop_assert!(next >= lo - tol && next <= hi + tol,
                "next {} outside [{}, {}]", next, lo, hi);
        }

        #[test]
        fn seeded_value_equals_first_price(price in 0.01..1_000_000.0f64, period in 1usize..500) {
            let mut ema = Ema::new(period);
            prop_assert_eq!(ema.update(price), price);
        }
    }
}
