use chrono::DateTime;

use scalp_signal::signals::classifier::{REASON_BUY, REASON_MIXED, REASON_SELL, TREND_UP_WEAK};
use scalp_signal::signals::{Bias, Verdict};
use scalp_signal::{EngineConfig, IndicatorEngine, PriceTick, Signal};

fn at(secs: i64, price: f64) -> PriceTick {
    PriceTick::new(DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap(), price)
}

fn engine() -> IndicatorEngine {
    IndicatorEngine::new(EngineConfig::default())
}

#[test]
fn waits_until_rsi_window_is_filled() {
    let mut engine = engine();
    let ticks = [at(0, 100.0), at(20, 101.0), at(40, 99.0), at(60, 103.0)];

    let results: Vec<_> = ticks.iter().map(|t| engine.evaluate(*t)).collect();
    for r in &results {
        assert_eq!(r.signal, Signal::Wait);
        assert!(r.indicators.rsi.is_none());
        assert!(r.indicators.volatility.is_none());
    }

    // t=40: nothing is a minute old yet, so the oldest tick anchors the change.
    let c40 = results[2].indicators.change_1m.unwrap();
    assert!((c40 + 1.0).abs() < 1e-10, "got {c40}");

    // t=60: the tick at t=0 is exactly a minute old.
    let c60 = results[3].indicators.change_1m.unwrap();
    assert!((c60 - 3.0).abs() < 1e-10, "got {c60}");
}

#[test]
fn seeded_scenario_resolves_all_indicators() {
    let mut engine = engine();
    for i in (1..=11).rev() {
        engine.evaluate(at(-20 * i, 100.0));
    }
    let ticks = [at(0, 100.0), at(20, 101.0), at(40, 99.0), at(60, 103.0)];
    let mut last = None;
    for t in ticks {
        last = Some(engine.evaluate(t));
    }
    let result = last.unwrap();

    assert_eq!(engine.history().len(), 15);

    // Deltas over the window: eleven zeros, +1, -2, +4 => RS 2.5.
    let rsi = result.indicators.rsi.unwrap();
    assert!((rsi - (100.0 - 100.0 / 3.5)).abs() < 1e-9, "got {rsi}");

    let change = result.indicators.change_1m.unwrap();
    assert!((change - 3.0).abs() < 1e-10, "got {change}");

    // Last ten prices: 100 x7, 101, 99, 103.
    let vol = result.indicators.volatility.unwrap();
    assert!((vol - 4.0 / 103.0 * 100.0).abs() < 1e-9, "got {vol}");

    // Fast above slow, but RSI above the 70 ceiling.
    assert!(result.ema_fast.unwrap() > result.ema_slow.unwrap());
    assert_eq!(result.signal, Signal::Wait);
    assert_eq!(result.verdict, Verdict::Mixed(Bias::Up));
    assert_eq!(result.trend, TREND_UP_WEAK);
    assert_eq!(result.reason, REASON_MIXED);
}

#[test]
fn stair_step_rally_signals_buy() {
    let mut engine = engine();
    let mut price = 2400.0;
    let mut result = engine.evaluate(at(0, price));
    // +2 / -1 alternating, ending on an up step.
    for i in 1..20 {
        price += if i % 2 == 1 { 2.0 } else { -1.0 };
        result = engine.evaluate(at(i * 20, price));
    }

    let rsi = result.indicators.rsi.unwrap();
    assert!((rsi - 200.0 / 3.0).abs() < 1e-9, "got {rsi}");
    assert!(result.indicators.change_1m.unwrap() > 0.0);
    assert_eq!(result.signal, Signal::Buy);
    assert_eq!(result.reason, REASON_BUY);
}

#[test]
fn stair_step_selloff_signals_sell() {
    let mut engine = engine();
    let mut price = 2400.0;
    let mut result = engine.evaluate(at(0, price));
    for i in 1..20 {
        price += if i % 2 == 1 { -2.0 } else { 1.0 };
        result = engine.evaluate(at(i * 20, price));
    }

    let rsi = result.indicators.rsi.unwrap();
    assert!((rsi - 100.0 / 3.0).abs() < 1e-9, "got {rsi}");
    assert!(result.indicators.change_1m.unwrap() < 0.0);
    assert_eq!(result.signal, Signal::Sell);
    assert_eq!(result.reason, REASON_SELL);
}

#[test]
fn redelivered_tick_does_not_double_count() {
    let mut engine = engine();
    for i in 0..5 {
        engine.evaluate(at(i * 10, 100.0 + i as f64));
    }
    let fast = engine.ema_fast();
    let slow = engine.ema_slow();
    let before = engine.current();

    let again = engine.evaluate(at(40, 104.0));

    assert_eq!(again, before);
    assert_eq!(engine.history().len(), 5);
    assert_eq!(engine.ema_fast(), fast);
    assert_eq!(engine.ema_slow(), slow);
}
