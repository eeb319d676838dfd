//! Tremor Frequency Estimation
//!
//! Two independent heuristics, kept as separate strategies:
//!
//! - [`ZeroCrossingEstimator`] runs on the capture side over one axis of
//!   the angular velocity series and counts sign changes across a
//!   dead band of ±11 deg/s.
//! - [`PowerSweepEstimator`] runs on the analysis side over the linear
//!   velocity series and correlates it against cosines at fixed candidate
//!   frequencies.
//!
//! Neither is a spectral transform. The sweep has no sine term and no
//! windowing, so its "power" is a phase-sensitive correlation proxy, good
//! enough for bucketing and nothing more.

use crate::capture::types::Axis;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Dead band half-width for a crossing (deg/s)
pub const CROSSING_THRESHOLD_DPS: f64 = 11.0;

/// Lowest capture-side frequency ever reported (Hz)
pub const MIN_CAPTURE_FREQUENCY_HZ: f64 = 0.0283;

/// Highest capture-side frequency ever reported (Hz)
pub const MAX_CAPTURE_FREQUENCY_HZ: f64 = 10.0;

/// First sweep candidate (Hz)
pub const SWEEP_MIN_HZ: f64 = 0.5;

/// Last sweep candidate (Hz)
pub const SWEEP_MAX_HZ: f64 = 12.0;

/// Sweep candidate spacing (Hz)
pub const SWEEP_STEP_HZ: f64 = 0.1;

/// Sample rate the sweep assumes for the velocity series (Hz)
pub const ASSUMED_SAMPLE_RATE_HZ: f64 = 100.0;

/// Candidate spacing for the plotted spectrum (Hz)
pub const DISPLAY_STEP_HZ: f64 = 0.05;

/// Dominant frequency and its power
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrequencyEstimate {
    pub dominant_hz: f64,
    pub power: f64,
}

/// Which pairs of samples count as a crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossingMode {
    /// Schmitt trigger: a crossing is counted whenever the signal leaves
    /// one side of the dead band and reaches the other, however many
    /// samples that takes. Time base is `N * dt`.
    #[default]
    Hysteresis,
    /// Only consecutive samples on opposite sides count, and the time base
    /// is `(N / 2) * dt`. Matches logs produced by the headset build.
    Adjacent,
}

/// Zero-crossing tremor frequency estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroCrossingEstimator {
    /// Angular velocity component to inspect
    pub axis: Axis,
    /// Dead band half-width (deg/s)
    pub threshold: f64,
    /// Crossing rule
    pub mode: CrossingMode,
}

impl ZeroCrossingEstimator {
    pub fn new() -> Self {
        Self {
            axis: Axis::X,
            threshold: CROSSING_THRESHOLD_DPS,
            mode: CrossingMode::Hysteresis,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.abs();
        self
    }

    pub fn with_mode(mut self, mode: CrossingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Estimate over an angular velocity series sampled every `tick_duration` seconds
    pub fn estimate(&self, angular_velocities: &[Vector3<f64>], tick_duration: f64) -> f64 {
        let series: Vec<f64> = angular_velocities
            .iter()
            .map(|v| self.axis.component(v))
            .collect();
        self.estimate_series(&series, tick_duration)
    }

    /// Estimate over a single-axis series. Returns 0 when no time elapsed.
    pub fn estimate_series(&self, series: &[f64], tick_duration: f64) -> f64 {
        let total_time = match self.mode {
            CrossingMode::Hysteresis => series.len() as f64 * tick_duration,
            CrossingMode::Adjacent => series.len() as f64 / 2.0 * tick_duration,
        };
        if !total_time.is_finite() || total_time <= 0.0 {
            return 0.0;
        }

        let crossings = self.count_crossings(series);
        (crossings as f64 / 2.0) / total_time
    }

    /// Number of crossings between `> +t` and `≤ -t` (or `< -t` and `≥ +t`)
    pub fn count_crossings(&self, series: &[f64]) -> usize {
        let t = self.threshold;
        match self.mode {
            CrossingMode::Adjacent => series
                .windows(2)
                .filter(|w| (w[0] > t && w[1] <= -t) || (w[0] < -t && w[1] >= t))
                .count(),
            CrossingMode::Hysteresis => {
                let mut crossings = 0;
                // Some(true) = last seen above the band, Some(false) = below
                let mut above: Option<bool> = None;
                for &v in series {
                    above = match above {
                        None if v > t => Some(true),
                        None if v < -t => Some(false),
                        Some(true) if v <= -t => {
                            crossings += 1;
                            Some(false)
                        }
                        Some(false) if v >= t => {
                            crossings += 1;
                            Some(true)
                        }
                        state => state,
                    };
                }
                crossings
            }
        }
    }
}

impl Default for ZeroCrossingEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a capture-side estimate to the reportable range
pub fn clamp_capture_frequency(hz: f64) -> f64 {
    if hz.is_nan() {
        return MIN_CAPTURE_FREQUENCY_HZ;
    }
    hz.clamp(MIN_CAPTURE_FREQUENCY_HZ, MAX_CAPTURE_FREQUENCY_HZ)
}

/// Cosine power sweep over a fixed candidate grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSweepEstimator {
    pub min_hz: f64,
    pub max_hz: f64,
    pub step_hz: f64,
    /// Sample rate assumed for the series (Hz)
    pub sample_rate_hz: f64,
}

impl PowerSweepEstimator {
    pub fn new() -> Self {
        Self {
            min_hz: SWEEP_MIN_HZ,
            max_hz: SWEEP_MAX_HZ,
            step_hz: SWEEP_STEP_HZ,
            sample_rate_hz: ASSUMED_SAMPLE_RATE_HZ,
        }
    }

    pub fn with_range(mut self, min_hz: f64, max_hz: f64, step_hz: f64) -> Self {
        self.min_hz = min_hz;
        self.max_hz = max_hz;
        self.step_hz = step_hz;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Candidate frequencies, computed from an integer index so the grid
    /// does not drift
    pub fn candidates(&self) -> Vec<f64> {
        grid(self.min_hz, self.max_hz, self.step_hz)
    }

    /// `|Σ v[i] · cos(2π f i / fs)|`
    pub fn power_at(&self, series: &[f64], hz: f64) -> f64 {
        if self.sample_rate_hz <= 0.0 {
            return 0.0;
        }
        let omega = TAU * hz / self.sample_rate_hz;
        series
            .iter()
            .enumerate()
            .map(|(i, v)| v * (omega * i as f64).cos())
            .sum::<f64>()
            .abs()
    }

    /// Candidate with maximum power; the first one wins ties.
    ///
    /// An empty series yields `{0 Hz, 0 power}`.
    pub fn estimate(&self, series: &[f64]) -> FrequencyEstimate {
        if series.is_empty() {
            return FrequencyEstimate::default();
        }

        let mut best: Option<FrequencyEstimate> = None;
        for hz in self.candidates() {
            let power = self.power_at(series, hz);
            match best {
                Some(current) if power <= current.power => {}
                _ => {
                    best = Some(FrequencyEstimate {
                        dominant_hz: hz,
                        power,
                    })
                }
            }
        }

        best.unwrap_or_default()
    }

    /// `(hz, power)` pairs for plotting, on a grid of `step_hz` over the sweep range
    pub fn spectrum(&self, series: &[f64], step_hz: f64) -> Vec<(f64, f64)> {
        grid(self.min_hz, self.max_hz, step_hz)
            .into_iter()
            .map(|hz| (hz, self.power_at(series, hz)))
            .collect()
    }
}

impl Default for PowerSweepEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn grid(min_hz: f64, max_hz: f64, step_hz: f64) -> Vec<f64> {
    if step_hz.is_nan() || step_hz <= 0.0 || !min_hz.is_finite() || !max_hz.is_finite() || max_hz < min_hz {
        return Vec::new();
    }
    // Tolerance absorbs float noise in (12.0 - 0.5) / 0.1
    let count = ((max_hz - min_hz) / step_hz + 1e-6).floor() as usize + 1;
    (0..count)
        .map(|i| {
            let hz = min_hz + i as f64 * step_hz;
            // Snap to the step's decimal grid so 0.5 + 45 * 0.1 prints as 5
            (hz * 1e6).round() / 1e6
        })
        .collect()
}
