// =============================================================================
// HistoryBuffer - bounded, time-ordered price history
// =============================================================================
//
// Ticks are appended in time order and the oldest are evicted once the buffer
// grows past `capacity`.  Malformed or out-of-order ticks are rejected without
// touching the stored contents.
// =============================================================================

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::PriceTick;

/// Default number of ticks retained.
pub const DEFAULT_CAPACITY: usize = 500;

/// Reason a tick was refused by [`HistoryBuffer::append`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TickRejection {
    #[error("price {0} is not a finite number")]
    NonFinitePrice(f64),

    #[error("price {0} is not positive")]
    NonPositivePrice(f64),

    #[error("tick at {got} is older than the last stored tick at {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        got: DateTime<Utc>,
    },

    #[error("a tick at {0} is already stored")]
    Duplicate(DateTime<Utc>),
}

/// Bounded FIFO of [`PriceTick`]s, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    ticks: Vec<PriceTick>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            ticks: Vec::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Append `tick` if its price is finite and positive and its time is later
    /// than the last stored tick.  A tick carrying the same time as the last
    /// one is treated as a re-delivery and refused.
    pub fn append(&mut self, tick: PriceTick) -> Result<(), TickRejection> {
        if !tick.price.is_finite() {
            return Err(TickRejection::NonFinitePrice(tick.price));
        }
        if tick.price <= 0.0 {
            return Err(TickRejection::NonPositivePrice(tick.price));
        }
        if let Some(last) = self.ticks.last() {
            if tick.time < last.time {
                return Err(TickRejection::OutOfOrder {
                    last: last.time,
                    got: tick.time,
                });
            }
            if tick.time == last.time {
                return Err(TickRejection::Duplicate(tick.time));
            }
        }

        self.ticks.push(tick);
        if self.ticks.len() > self.capacity {
            let excess = self.ticks.len() - self.capacity;
            self.ticks.drain(..excess);
        }
        Ok(())
    }

    /// Read-only, oldest-first view of the stored ticks.
    pub fn snapshot(&self) -> &[PriceTick] {
        &self.ticks
    }

    /// Prices in insertion order.
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|t| t.price)
    }

    pub fn last(&self) -> Option<&PriceTick> {
        self.ticks.last()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64, price: f64) -> PriceTick {
        PriceTick::new(DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap(), price)
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut buf = HistoryBuffer::new(10);
        buf.append(at(0, 1.0)).unwrap();
        buf.append(at(5, 2.0)).unwrap();
        buf.append(at(9, 3.0)).unwrap();
        assert_eq!(buf.prices().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(buf.last().unwrap().price, 3.0);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut buf = HistoryBuffer::new(3);
        for i in 0..5 {
            buf.append(at(i, 100.0 + i as f64)).unwrap();
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.prices().collect::<Vec<_>>(), vec![102.0, 103.0, 104.0]);
    }

    #[test]
    fn rejects_non_finite_and_non_positive_prices() {
        let mut buf = HistoryBuffer::new(3);
        assert_eq!(
            buf.append(at(0, 0.0)),
            Err(TickRejection::NonPositivePrice(0.0))
        );
        assert_eq!(
            buf.append(at(0, -5.0)),
            Err(TickRejection::NonPositivePrice(-5.0))
        );
        assert!(matches!(
            buf.append(at(0, f64::NAN)),
            Err(TickRejection::NonFinitePrice(_))
        ));
        assert!(matches!(
            buf.append(at(0, f64::INFINITY)),
            Err(TickRejection::NonFinitePrice(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn rejects_out_of_order_and_duplicate_times() {
        let mut buf = HistoryBuffer::new(5);
        buf.append(at(10, 1.0)).unwrap();

        let err = buf.append(at(5, 2.0)).unwrap_err();
        assert!(matches!(err, TickRejection::OutOfOrder { .. }));

        let err = buf.append(at(10, 2.0)).unwrap_err();
        assert_eq!(err, TickRejection::Duplicate(at(10, 0.0).time));

        assert_eq!(buf.len(), 1);
        assert_eq!(buf.last().unwrap().price, 1.0);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut buf = HistoryBuffer::new(0);
        buf.append(at(0, 1.0)).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn default_capacity_is_500() {
        let mut buf = HistoryBuffer::default();
        for i in 0..600 {
            buf.append(at(i, 50.0)).unwrap();
        }
        assert_eq!(buf.len(), DEFAULT_CAPACITY);
        assert_eq!(buf.snapshot()[0].time, at(100, 0.0).time);
    }
}
