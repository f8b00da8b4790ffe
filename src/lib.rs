// =============================================================================
// Scalp Signal - streaming indicator & signal engine
// =============================================================================
//
// Library surface of the service.  The engine (`engine`, `indicators`,
// `signals`, `market_data::history_buffer`) has no I/O; the feeds, app state
// and API wrap it for the running binary.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod engine;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod signals;
pub mod types;

pub use engine::{IndicatorEngine, SignalResult};
pub use runtime_config::{EngineConfig, RuntimeConfig};
pub use types::{PriceTick, Signal};
