//! Session Aggregation
//!
//! Rolls a finished capture up into a [`SessionLog`]: summary averages, the
//! capture-side frequency estimate and the wire-precision series.

use super::context::TaskCounters;
use super::log::SessionLog;
use crate::analysis::frequency::{clamp_capture_frequency, ZeroCrossingEstimator};
use crate::analysis::stats::mean;
use crate::capture::SessionCapture;
use crate::codec::format::{quantize, SUMMARY_DECIMALS};

/// Frequency is only estimated with more metrics than this
pub const MIN_METRICS_FOR_FREQUENCY: usize = 2;

/// Builds session logs from captures
#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    estimator: ZeroCrossingEstimator,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimator(estimator: ZeroCrossingEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &ZeroCrossingEstimator {
        &self.estimator
    }

    /// Finalize a capture. Pure: identical inputs give identical logs.
    pub fn finalize(&self, capture: &SessionCapture, counters: &TaskCounters) -> SessionLog {
        let avg_velocity = mean(&capture.velocities());
        let avg_shake = mean(&capture.shakes());

        let raw_hz = if capture.metrics.len() > MIN_METRICS_FOR_FREQUENCY {
            self.estimator
                .estimate(&capture.angular_velocities(), capture.tick_duration)
        } else {
            0.0
        };
        let frequency_hz = clamp_capture_frequency(raw_hz);

        let log = SessionLog {
            logger_name: capture.channel.clone(),
            avg_velocity: quantize(avg_velocity, SUMMARY_DECIMALS),
            avg_shake: quantize(avg_shake, SUMMARY_DECIMALS),
            points: capture.samples.len() as u64,
            frequency_hz,
            apples_picked: counters.apples_picked,
            total_apples: counters.total_apples,
            velocity_log: capture.logs.velocity.clone(),
            shake_log: capture.logs.shake.clone(),
            positions: capture.logs.positions.clone(),
        };

        tracing::info!(
            channel = %log.logger_name,
            points = log.points,
            avg_velocity = log.avg_velocity,
            avg_shake = log.avg_shake,
            frequency_hz = log.frequency_hz,
            large_shakes = capture.large_shakes,
            "Session finalized"
        );

        log
    }
}
