// =============================================================================
// High-Low Volatility Range
// =============================================================================
//
// Percentage spread between the highest and lowest price of the most recent
// `lookback` ticks, relative to the high:
//   VOL = (high - low) / high * 100

/// Default number of ticks in the window.
pub const DEFAULT_VOLATILITY_LOOKBACK: usize = 10;

/// Returns `None` with fewer than `lookback` prices (or a zero lookback) and
/// `Some(0.0)` when the window high is exactly zero.
pub fn calculate_volatility(prices: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || prices.len() < lookback {
        return None;
    }

    let window = &prices[prices.len() - lookback..];
    let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().copied().fold(f64::INFINITY, f64::min);

    if high == 0.0 {
        return Some(0.0);
    }
    Some((high - low) / high * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn volatility_insufficient_data() {
        assert!(calculate_volatility(&[1.0; 9], 10).is_none());
        assert!(calculate_volatility(&[1.0; 3], 0).is_none());
    }

    #[test]
    fn volatility_flat_window_is_zero() {
        assert_eq!(calculate_volatility(&[2400.0; 10], 10), Some(0.0));
    }

    #[test]
    fn volatility_uses_latest_window_only() {
        let mut prices = vec![1.0, 1000.0];
        prices.extend([100.0, 95.0, 98.0, 99.0]);
        let vol = calculate_volatility(&prices, 4).unwrap();
        assert!((vol - 5.0).abs() < 1e-10, "got {vol}");
    }

    #[test]
    fn volatility_zero_high_guard() {
        assert_eq!(calculate_volatility(&[0.0, 0.0, 0.0], 3), Some(0.0));
    }

    proptest! {
        #[test]
        fn volatility_is_non_negative(
            prices in prop::collection::vec(0.01..100_000.0f64, 10..60),
        ) {
            let vol = calculate_volatility(&prices, 10).unwrap();
            prop_assert!(vol >= 0.0);
            prop_assert!(vol < 100.0);
        }
    }
}
