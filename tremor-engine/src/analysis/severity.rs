//! Severity Scoring
//!
//! Maps tremor intensity, sweep power and task success onto a 0-4 score.
//! Each input is bucketed on its own, the buckets are averaged, and the
//! result is attenuated when the dominant frequency falls outside the
//! physiological tremor band.

use serde::{Deserialize, Serialize};

/// Highest possible score
pub const MAX_SEVERITY: u8 = 4;

/// Lower edge of the tremor band (Hz, inclusive)
pub const TREMOR_BAND_MIN_HZ: f64 = 3.5;

/// Upper edge of the tremor band (Hz, inclusive)
pub const TREMOR_BAND_MAX_HZ: f64 = 7.0;

/// Factor applied to the base score outside the band
pub const OUT_OF_BAND_ATTENUATION: f64 = 0.3;

/// Bucket edges and band limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    /// Ascending upper bounds (exclusive) for intensity buckets 0..=3 (m/s)
    pub intensity: [f64; 4],
    /// Ascending upper bounds (exclusive) for power buckets 0..=3
    pub power: [f64; 4],
    /// Descending lower bounds (exclusive) for success buckets 0..=3
    pub success: [f64; 4],
    pub band_min_hz: f64,
    pub band_max_hz: f64,
    pub out_of_band_attenuation: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            intensity: [0.5, 1.0, 2.0, 3.0],
            power: [100.0, 300.0, 600.0, 1000.0],
            success: [0.9, 0.7, 0.5, 0.3],
            band_min_hz: TREMOR_BAND_MIN_HZ,
            band_max_hz: TREMOR_BAND_MAX_HZ,
            out_of_band_attenuation: OUT_OF_BAND_ATTENUATION,
        }
    }
}

impl SeverityThresholds {
    /// Check the edges are ordered and the band is sane
    pub fn validate(&self) -> crate::Result<()> {
        let ascending = |edges: &[f64; 4]| edges.windows(2).all(|w| w[0] < w[1]);
        if !ascending(&self.intensity) {
            return Err(crate::Error::Config("intensity thresholds must be ascending".into()));
        }
        if !ascending(&self.power) {
            return Err(crate::Error::Config("power thresholds must be ascending".into()));
        }
        if !self.success.windows(2).all(|w| w[0] > w[1]) {
            return Err(crate::Error::Config("success thresholds must be descending".into()));
        }
        if self.band_min_hz > self.band_max_hz {
            return Err(crate::Error::Config(format!(
                "tremor band is empty: {} > {} Hz",
                self.band_min_hz, self.band_max_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.out_of_band_attenuation) {
            return Err(crate::Error::Config(format!(
                "out_of_band_attenuation must be within [0, 1], got {}",
                self.out_of_band_attenuation
            )));
        }
        Ok(())
    }
}

/// Score with the contributions that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityScore {
    /// Final 0-4 score
    pub score: u8,
    pub intensity_bucket: u8,
    pub power_bucket: u8,
    pub success_bucket: u8,
    /// Mean of the three buckets
    pub base: f64,
    /// Whether the dominant frequency is inside the tremor band
    pub in_band: bool,
    /// Base after attenuation, before rounding
    pub raw: f64,
}

/// Bucketed severity scorer
#[derive(Debug, Clone, Default)]
pub struct SeverityScorer {
    thresholds: SeverityThresholds,
}

impl SeverityScorer {
    pub fn new(thresholds: SeverityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    /// Score one session
    pub fn score(
        &self,
        intensity: f64,
        frequency_power: f64,
        success_rate: f64,
        dominant_hz: f64,
    ) -> SeverityScore {
        let intensity_bucket = self.intensity_bucket(intensity);
        let power_bucket = self.power_bucket(frequency_power);
        let success_bucket = self.success_bucket(success_rate);

        let base = (intensity_bucket + power_bucket + success_bucket) as f64 / 3.0;
        let in_band = self.in_band(dominant_hz);
        let raw = if in_band {
            base
        } else {
            base * self.thresholds.out_of_band_attenuation
        };

        let score = raw.round().clamp(0.0, MAX_SEVERITY as f64) as u8;

        SeverityScore {
            score,
            intensity_bucket,
            power_bucket,
            success_bucket,
            base,
            in_band,
            raw,
        }
    }

    /// `< e0 -> 0, < e1 -> 1, < e2 -> 2, < e3 -> 3, else 4`
    pub fn intensity_bucket(&self, intensity: f64) -> u8 {
        ascending_bucket(intensity, &self.thresholds.intensity)
    }

    /// Same scheme as intensity, on sweep power
    pub fn power_bucket(&self, power: f64) -> u8 {
        ascending_bucket(power, &self.thresholds.power)
    }

    /// `> e0 -> 0, > e1 -> 1, > e2 -> 2, > e3 -> 3, else 4`
    pub fn success_bucket(&self, success_rate: f64) -> u8 {
        // Unknown rate contributes nothing, like the other two buckets
        if success_rate.is_nan() {
            return 0;
        }
        self.thresholds
            .success
            .iter()
            .position(|&edge| success_rate > edge)
            .unwrap_or(self.thresholds.success.len()) as u8
    }

    /// Inclusive band check
    pub fn in_band(&self, hz: f64) -> bool {
        hz >= self.thresholds.band_min_hz && hz <= self.thresholds.band_max_hz
    }
}

fn ascending_bucket(value: f64, edges: &[f64; 4]) -> u8 {
    // NaN fails every comparison and would land in the top bucket; treat it as 0
    if value.is_nan() {
        return 0;
    }
    edges.iter().position(|&edge| value < edge).unwrap_or(edges.len()) as u8
}
