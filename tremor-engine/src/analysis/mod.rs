//! Tremor analysis
//!
//! Pure, synchronous analysis of session data:
//! - Series statistics (mean, percentile tremor intensity)
//! - Tremor frequency estimation (zero crossing and power sweep)
//! - Bucketed 0-4 severity scoring
//! - Per-session reports

pub mod stats;
pub mod frequency;
pub mod severity;
pub mod report;

pub use frequency::{
    clamp_capture_frequency, CrossingMode, FrequencyEstimate, PowerSweepEstimator,
    ZeroCrossingEstimator,
};
pub use report::{SessionAnalyzer, SessionReport};
pub use severity::{SeverityScore, SeverityScorer, SeverityThresholds};
