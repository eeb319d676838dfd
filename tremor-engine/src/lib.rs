//! # Tremor Engine
//!
//! Captures hand-motion telemetry from a VR therapy exercise and derives
//! tremor metrics: linear velocity, angular shake, a dominant tremor
//! frequency and a 0-4 severity score modelled loosely on a UPDRS tremor item.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tremor_engine::capture::{LoggingGate, Orientation, SampleRecorder};
//! use tremor_engine::session::{SessionAggregator, TaskCounters};
//! use tremor_engine::codec::{decode, encode};
//! use tremor_engine::analysis::SessionAnalyzer;
//! use nalgebra::Vector3;
//!
//! let gate = LoggingGate::new();
//! let mut recorder = SampleRecorder::new("right", gate.clone());
//! gate.activate();
//!
//! for i in 0..100 {
//!     let t = i as f64 * 0.02;
//!     let position = Vector3::new(0.01 * t.sin(), 1.2, 0.4);
//!     let orientation = Orientation::euler(20.0 * (t * 30.0).sin(), 0.0, 0.0);
//!     recorder.tick(position, orientation, 0.02);
//! }
//!
//! let counters = TaskCounters { apples_picked: 8, total_apples: 10 };
//! let log = SessionAggregator::new().finalize(recorder.capture(), &counters);
//! let text = encode(&log);
//!
//! let report = SessionAnalyzer::default().analyze(&decode(&text));
//! println!("severity {}", report.severity.score);
//! ```
//!
//! ## Architecture
//!
//! - [`time`]: Deterministic fixed-timestep clock
//! - [`capture`]: Per-tick sampling and derived motion metrics
//! - [`session`]: Session context, lifecycle control and aggregation
//! - [`codec`]: Session log text format and tolerant decoder
//! - [`analysis`]: Frequency estimation, statistics and severity scoring
//! - [`storage`]: Log store abstraction and path convention
//! - [`app`]: CLI and configuration management
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ Engine loop │───▶│  Recorder   │───▶│ Aggregator  │───▶│   Encoder   │
//! │ (fixed dt)  │    │ (per tick)  │    │ (on end)    │    │   (text)    │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                                                 │
//!                                                                 ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Report    │◀───│  Severity   │◀───│  Frequency  │◀───│   Decoder   │
//! │             │    │   Scorer    │    │  Estimators │    │ (tolerant)  │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod time;
pub mod capture;
pub mod session;
pub mod codec;
pub mod analysis;
pub mod storage;
pub mod app;

// Re-export commonly used types
pub use capture::{DerivedMetric, LoggingGate, Orientation, Sample, SampleRecorder};
pub use session::{SessionAggregator, SessionContext, SessionLog, TaskCounters};
pub use analysis::{SessionAnalyzer, SessionReport, SeverityScore, SeverityScorer};
pub use time::timestep::FixedTimestep;

/// Result type alias for the tremor engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the tremor engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
