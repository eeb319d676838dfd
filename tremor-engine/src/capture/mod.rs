//! Motion capture module
//!
//! Turns the per-tick transforms supplied by the engine loop into samples
//! and derived motion metrics. One recorder runs per tracked body part and
//! every recorder reads the same logging gate.

pub mod types;
pub mod recorder;
pub mod synthetic;

pub use types::{delta_angle, normalize_degrees, Axis, DerivedMetric, Orientation, Sample};
pub use recorder::{LoggingGate, RunningLogs, SampleRecorder, SessionCapture, LARGE_SHAKE_THRESHOLD_DPS};
pub use synthetic::SyntheticHand;
