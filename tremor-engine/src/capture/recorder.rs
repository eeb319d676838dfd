//! Sample Recorder
//!
//! Accumulates fixed-timestep samples for one tracked body part while the
//! process-wide logging gate is open, deriving velocity and angular shake
//! on every tick after the first.

use super::types::{DerivedMetric, Orientation, Sample};
use crate::codec::format::{quantize, POSITION_DECIMALS, SERIES_DECIMALS};
use nalgebra::Vector3;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Angular shake above this magnitude counts as a large shake (deg/s)
pub const LARGE_SHAKE_THRESHOLD_DPS: f64 = 4.0;

/// Shared on/off switch for every recorder in the process.
///
/// Driven by a single session-control authority; recorders only read it.
#[derive(Debug, Clone, Default)]
pub struct LoggingGate {
    active: Arc<AtomicBool>,
}

impl LoggingGate {
    /// Create a closed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Start logging
    pub fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    /// Stop logging
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Whether recorders should record this tick
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Wire-precision views of the captured series, appended every tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningLogs {
    /// Linear velocities rounded to 4 decimals
    pub velocity: Vec<f64>,
    /// Shake magnitudes rounded to 4 decimals
    pub shake: Vec<f64>,
    /// Positions rounded to 3 decimals
    pub positions: Vec<[f64; 3]>,
}

/// Everything one recorder captured during a session
#[derive(Debug, Clone, Default)]
pub struct SessionCapture {
    /// Logical channel name (e.g. "left", "right")
    pub channel: String,
    /// Recorded samples in tick order
    pub samples: Vec<Sample>,
    /// One metric per sample after the first
    pub metrics: Vec<DerivedMetric>,
    /// Wire-precision series
    pub logs: RunningLogs,
    /// Number of ticks whose shake exceeded the large-shake threshold
    pub large_shakes: u32,
    /// Tick duration used for the session (seconds)
    pub tick_duration: f64,
}

impl SessionCapture {
    /// Create an empty capture for a channel
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    /// Linear velocity series
    pub fn velocities(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.linear_velocity).collect()
    }

    /// Shake magnitude series
    pub fn shakes(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.shake_magnitude).collect()
    }

    /// Angular velocity series
    pub fn angular_velocities(&self) -> Vec<Vector3<f64>> {
        self.metrics.iter().map(|m| m.angular_velocity).collect()
    }

    /// Check the sample/metric count invariant
    pub fn is_consistent(&self) -> bool {
        self.metrics.len() == self.samples.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Per-channel recorder fed once per engine tick
#[derive(Debug)]
pub struct SampleRecorder {
    gate: LoggingGate,
    large_shake_threshold: f64,
    baseline: Option<Sample>,
    capture: SessionCapture,
}

impl SampleRecorder {
    /// Create a recorder for `channel` reading the given gate
    pub fn new(channel: impl Into<String>, gate: LoggingGate) -> Self {
        Self {
            gate,
            large_shake_threshold: LARGE_SHAKE_THRESHOLD_DPS,
            baseline: None,
            capture: SessionCapture::new(channel),
        }
    }

    /// Override the large-shake threshold (deg/s)
    pub fn with_large_shake_threshold(mut self, threshold: f64) -> Self {
        self.large_shake_threshold = threshold;
        self
    }

    /// Channel name
    pub fn channel(&self) -> &str {
        &self.capture.channel
    }

    /// Engine entry point, called every fixed tick.
    ///
    /// Does nothing while the gate is closed. The first tick recorded after
    /// the gate opens becomes the baseline and yields no metric.
    pub fn tick(
        &mut self,
        position: Vector3<f64>,
        orientation: Orientation,
        tick_duration: f64,
    ) -> Option<DerivedMetric> {
        if !self.gate.is_active() {
            return None;
        }
        let is_first = self.baseline.is_none();
        self.record(position, orientation, tick_duration, is_first)
    }

    /// Record one sample regardless of the gate.
    ///
    /// With `is_first_sample` the sample only becomes the new baseline; any
    /// samples already captured are dropped so the capture restarts from it.
    pub fn record(
        &mut self,
        position: Vector3<f64>,
        orientation: Orientation,
        tick_duration: f64,
        is_first_sample: bool,
    ) -> Option<DerivedMetric> {
        if is_first_sample && !self.capture.is_empty() {
            // A new baseline starts a new capture so metrics stay one behind samples
            let channel = self.capture.channel.clone();
            let previous = std::mem::replace(&mut self.capture, SessionCapture::new(channel));
            tracing::debug!(
                channel = %previous.channel,
                discarded = previous.samples.len(),
                "Capture re-baselined"
            );
        }

        let sample = Sample::new(position, orientation, tick_duration);
        self.capture.samples.push(sample);
        self.capture.tick_duration = tick_duration;

        let metric = if is_first_sample {
            None
        } else {
            self.baseline
                .map(|previous| DerivedMetric::between(&previous, &sample, tick_duration))
        };
        if let Some(metric) = metric {
            self.append_metric(metric);
        }

        self.capture.logs.positions.push([
            quantize(position.x, POSITION_DECIMALS),
            quantize(position.y, POSITION_DECIMALS),
            quantize(position.z, POSITION_DECIMALS),
        ]);
        self.baseline = Some(sample);

        metric
    }

    fn append_metric(&mut self, metric: DerivedMetric) {
        if metric.shake_magnitude > self.large_shake_threshold {
            self.capture.large_shakes += 1;
        }
        self.capture
            .logs
            .velocity
            .push(quantize(metric.linear_velocity, SERIES_DECIMALS));
        self.capture
            .logs
            .shake
            .push(quantize(metric.shake_magnitude, SERIES_DECIMALS));
        self.capture.metrics.push(metric);
    }

    /// Captured data so far
    pub fn capture(&self) -> &SessionCapture {
        &self.capture
    }

    /// Large shakes counted so far
    pub fn large_shakes(&self) -> u32 {
        self.capture.large_shakes
    }

    /// Take the capture and reset the recorder for a new session
    pub fn take_capture(&mut self) -> SessionCapture {
        self.baseline = None;
        let channel = self.capture.channel.clone();
        std::mem::replace(&mut self.capture, SessionCapture::new(channel))
    }

    /// Discard everything captured and forget the baseline
    pub fn reset(&mut self) {
        let _ = self.take_capture();
    }
}
