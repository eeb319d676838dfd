//! Configuration Management

use crate::analysis::frequency::{
    CrossingMode, PowerSweepEstimator, ZeroCrossingEstimator, ASSUMED_SAMPLE_RATE_HZ,
    CROSSING_THRESHOLD_DPS, DISPLAY_STEP_HZ, SWEEP_MAX_HZ, SWEEP_MIN_HZ, SWEEP_STEP_HZ,
};
use crate::analysis::{SessionAnalyzer, SeverityScorer, SeverityThresholds};
use crate::capture::{Axis, LARGE_SHAKE_THRESHOLD_DPS};
use crate::session::SessionSettings;
use crate::time::DEFAULT_TICK_DURATION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Capture settings
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Frequency estimation settings
    #[serde(default)]
    pub frequency: FrequencyConfig,
    /// Severity bucket edges
    #[serde(default)]
    pub severity: SeverityThresholds,
    /// Session lifecycle
    #[serde(default)]
    pub session: SessionSettings,
    /// Log storage
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Fixed tick duration (seconds)
    pub tick_duration_secs: f64,
    /// Shake above this counts as a large shake (deg/s)
    pub large_shake_threshold_dps: f64,
}

/// Frequency estimation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Angular velocity axis used for zero crossings
    pub axis: Axis,
    /// Zero-crossing dead band half-width (deg/s)
    pub crossing_threshold_dps: f64,
    /// Zero-crossing rule
    pub crossing_mode: CrossingMode,
    /// Power sweep range and resolution (Hz)
    pub sweep_min_hz: f64,
    pub sweep_max_hz: f64,
    pub sweep_step_hz: f64,
    /// Sample rate the sweep assumes (Hz)
    pub sample_rate_hz: f64,
    /// Resolution of the plotted spectrum (Hz)
    pub display_step_hz: f64,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the session log tree
    pub root: PathBuf,
    /// Stamp each log line with `[HH:MM:SS]`
    pub timestamp_lines: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs: DEFAULT_TICK_DURATION,
            large_shake_threshold_dps: LARGE_SHAKE_THRESHOLD_DPS,
        }
    }
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            crossing_threshold_dps: CROSSING_THRESHOLD_DPS,
            crossing_mode: CrossingMode::Hysteresis,
            sweep_min_hz: SWEEP_MIN_HZ,
            sweep_max_hz: SWEEP_MAX_HZ,
            sweep_step_hz: SWEEP_STEP_HZ,
            sample_rate_hz: ASSUMED_SAMPLE_RATE_HZ,
            display_step_hz: DISPLAY_STEP_HZ,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: crate::storage::directory::default_root(),
            timestamp_lines: false,
        }
    }
}

impl FrequencyConfig {
    /// Zero-crossing estimator with these settings
    pub fn zero_crossing(&self) -> ZeroCrossingEstimator {
        ZeroCrossingEstimator::new()
            .with_axis(self.axis)
            .with_threshold(self.crossing_threshold_dps)
            .with_mode(self.crossing_mode)
    }

    /// Power sweep estimator with these settings
    pub fn power_sweep(&self) -> PowerSweepEstimator {
        PowerSweepEstimator::new()
            .with_range(self.sweep_min_hz, self.sweep_max_hz, self.sweep_step_hz)
            .with_sample_rate(self.sample_rate_hz)
    }
}

/// Finite and strictly positive; NaN and infinities fail
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let dt = self.capture.tick_duration_secs;
        if !(dt > 0.0 && dt <= 1.0) {
            return Err(crate::Error::Config(format!(
                "tick_duration_secs must be in (0, 1], got {}", dt
            )));
        }
        if !(self.capture.large_shake_threshold_dps >= 0.0
            && self.capture.large_shake_threshold_dps.is_finite())
        {
            return Err(crate::Error::Config(format!(
                "large_shake_threshold_dps must be >= 0, got {}", self.capture.large_shake_threshold_dps
            )));
        }
        if !(self.frequency.crossing_threshold_dps >= 0.0
            && self.frequency.crossing_threshold_dps.is_finite())
        {
            return Err(crate::Error::Config(format!(
                "crossing_threshold_dps must be >= 0, got {}", self.frequency.crossing_threshold_dps
            )));
        }
        let f = &self.frequency;
        if !(f.sweep_min_hz > 0.0 && f.sweep_min_hz <= f.sweep_max_hz && f.sweep_max_hz.is_finite()) {
            return Err(crate::Error::Config(format!(
                "sweep range must satisfy 0 < min <= max, got {}..{}", f.sweep_min_hz, f.sweep_max_hz
            )));
        }
        if !(is_positive(f.sweep_step_hz) && is_positive(f.display_step_hz)) {
            return Err(crate::Error::Config("sweep and display steps must be > 0".to_string()));
        }
        if !is_positive(f.sample_rate_hz) {
            return Err(crate::Error::Config(format!(
                "sample_rate_hz must be > 0, got {}", f.sample_rate_hz
            )));
        }
        self.severity.validate()?;
        if !is_positive(self.session.duration_secs) {
            return Err(crate::Error::Config(format!(
                "session duration must be > 0, got {}", self.session.duration_secs
            )));
        }
        if self.session.channels.is_empty() {
            return Err(crate::Error::Config("at least one channel is required".to_string()));
        }
        if !(self.session.punch_threshold >= 0.0 && self.session.punch_threshold.is_finite()) {
            return Err(crate::Error::Config(format!(
                "punch_threshold must be >= 0, got {}", self.session.punch_threshold
            )));
        }
        Ok(())
    }

    /// Offline analyzer built from the frequency and severity sections
    pub fn analyzer(&self) -> SessionAnalyzer {
        SessionAnalyzer::new(
            self.frequency.power_sweep(),
            SeverityScorer::new(self.severity.clone()),
        )
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".tremor_engine").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
