// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based classification of indicator values into BUY / SELL / WAIT with a
// trend label and rationale.

pub mod classifier;

pub use classifier::{classify, Bias, ClassifierInputs, SignalThresholds, Verdict};
