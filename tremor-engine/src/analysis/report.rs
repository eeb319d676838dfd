//! Session Report
//!
//! Offline analysis of one decoded session log: tremor intensity, power
//! sweep, severity and the dashboard's flagged-shake count.

use super::frequency::{FrequencyEstimate, PowerSweepEstimator};
use super::severity::{SeverityScore, SeverityScorer};
use super::stats;
use crate::codec::{DecodedLog, LogField};
use serde::{Deserialize, Serialize};

/// Shakes above this magnitude are highlighted on the dashboard chart
pub const SHAKE_HIGHLIGHT_THRESHOLD: f64 = 0.5;

/// Analysis result for one channel of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub channel: String,
    pub avg_velocity: f64,
    pub avg_shake: f64,
    pub points: u64,
    /// Frequency reported by the capture side (Hz)
    pub capture_frequency_hz: f64,
    pub apples_picked: u32,
    pub total_apples: u32,
    pub success_rate: f64,
    /// 95th percentile of the velocity series (m/s)
    pub tremor_intensity: f64,
    /// Power sweep result over the velocity series
    pub dominant: FrequencyEstimate,
    pub severity: SeverityScore,
    /// Shake samples above the highlight threshold
    pub flagged_shakes: usize,
    /// Fields the log did not carry
    pub missing: Vec<LogField>,
}

impl SessionReport {
    /// Pretty JSON for the CLI and dashboards
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the offline analysis pipeline
#[derive(Debug, Clone)]
pub struct SessionAnalyzer {
    sweep: PowerSweepEstimator,
    scorer: SeverityScorer,
    highlight_threshold: f64,
}

impl SessionAnalyzer {
    pub fn new(sweep: PowerSweepEstimator, scorer: SeverityScorer) -> Self {
        Self {
            sweep,
            scorer,
            highlight_threshold: SHAKE_HIGHLIGHT_THRESHOLD,
        }
    }

    pub fn with_highlight_threshold(mut self, threshold: f64) -> Self {
        self.highlight_threshold = threshold;
        self
    }

    pub fn sweep(&self) -> &PowerSweepEstimator {
        &self.sweep
    }

    /// Analyze a decoded log. Never fails; missing series contribute zeros.
    pub fn analyze(&self, decoded: &DecodedLog) -> SessionReport {
        let log = &decoded.log;

        let tremor_intensity = stats::tremor_intensity(&log.velocity_log);
        let dominant = self.sweep.estimate(&log.velocity_log);
        let success_rate = log.success_rate();
        let severity = self.scorer.score(
            tremor_intensity,
            dominant.power,
            success_rate,
            dominant.dominant_hz,
        );

        tracing::debug!(
            channel = %log.logger_name,
            intensity = tremor_intensity,
            dominant_hz = dominant.dominant_hz,
            power = dominant.power,
            score = severity.score,
            "Session analyzed"
        );

        SessionReport {
            channel: log.logger_name.clone(),
            avg_velocity: log.avg_velocity,
            avg_shake: log.avg_shake,
            points: log.points,
            capture_frequency_hz: log.frequency_hz,
            apples_picked: log.apples_picked,
            total_apples: log.total_apples,
            success_rate,
            tremor_intensity,
            dominant,
            severity,
            flagged_shakes: stats::count_above(&log.shake_log, self.highlight_threshold),
            missing: decoded.missing.clone(),
        }
    }
}

impl Default for SessionAnalyzer {
    fn default() -> Self {
        Self::new(PowerSweepEstimator::default(), SeverityScorer::default())
    }
}
