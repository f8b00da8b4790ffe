// =============================================================================
// Central Application State
// =============================================================================
//
// Ties the engine to the dashboard.  The price poller is the only writer of
// the engine; API handlers only ever read the published copies below.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::Mutex around the engine (single writer).
//   - parking_lot::RwLock for the published result, signal history and news.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use crate::engine::{IndicatorEngine, SignalResult};
use crate::market_data::{NewsItem, TickRejection};
use crate::runtime_config::RuntimeConfig;
use crate::types::{PriceTick, Signal};

/// One row of the dashboard's signal history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalHistoryEntry {
    pub time: DateTime<Utc>,
    pub signal: Signal,
    pub price: f64,
}

/// Shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    /// Incremented on every accepted tick and news refresh.
    pub state_version: AtomicU64,

    pub runtime_config: RuntimeConfig,

    engine: Mutex<IndicatorEngine>,

    pub latest: RwLock<Option<SignalResult>>,

    /// Newest first, capped at `signal_history_len`.
    pub signal_history: RwLock<VecDeque<SignalHistoryEntry>>,

    pub news: RwLock<Vec<NewsItem>>,

    pub last_fetch_error: RwLock<Option<String>>,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            engine: Mutex::new(IndicatorEngine::new(config.engine.clone())),
            signal_history: RwLock::new(VecDeque::with_capacity(config.signal_history_len)),
            runtime_config: config,
            latest: RwLock::new(None),
            news: RwLock::new(Vec::new()),
            last_fetch_error: RwLock::new(None),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version tracking ────────────────────────────────────────────────

    /// Atomically increment the state version and return the *previous* value.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Ingestion ───────────────────────────────────────────────────────

    /// Run `tick` through the engine and publish the result.  Rejected ticks
    /// change nothing and are returned to the caller for logging.
    pub fn ingest(&self, tick: PriceTick) -> Result<SignalResult, TickRejection> {
        let result = self.engine.lock().try_evaluate(tick)?;

        self.push_history(SignalHistoryEntry {
            time: tick.time,
            signal: result.signal,
            price: tick.price,
        });
        *self.latest.write() = Some(result.clone());
        *self.last_fetch_error.write() = None;
        self.increment_version();

        Ok(result)
    }

    fn push_history(&self, entry: SignalHistoryEntry) {
        let cap = self.runtime_config.signal_history_len;
        let mut history = self.signal_history.write();
        history.push_front(entry);
        history.truncate(cap);
    }

    pub fn history_snapshot(&self) -> Vec<SignalHistoryEntry> {
        self.signal_history.read().iter().cloned().collect()
    }

    pub fn latest_result(&self) -> Option<SignalResult> {
        self.latest.read().clone()
    }

    // ── Collaborator bookkeeping ────────────────────────────────────────

    pub fn set_news(&self, items: Vec<NewsItem>) {
        debug!(count = items.len(), "news replaced");
        *self.news.write() = items;
        self.increment_version();
    }

    pub fn record_fetch_error(&self, msg: String) {
        *self.last_fetch_error.write() = Some(msg);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
