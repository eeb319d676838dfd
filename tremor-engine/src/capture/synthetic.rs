//! Synthetic hand motion
//!
//! Deterministic tremor-like motion for demos, benchmarks and tests: a slow
//! reaching sweep with a pitch oscillation at the tremor frequency layered
//! on top.

use super::types::Orientation;
use nalgebra::Vector3;
use std::f64::consts::TAU;

/// Parametric hand trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticHand {
    /// Resting position (metres)
    pub origin: Vector3<f64>,
    /// Tremor oscillation frequency (Hz)
    pub tremor_hz: f64,
    /// Peak pitch excursion of the tremor (degrees)
    pub tremor_amplitude_deg: f64,
    /// Positional displacement caused by the tremor (metres)
    pub tremor_displacement_m: f64,
    /// Frequency of the voluntary reaching sweep (Hz)
    pub reach_hz: f64,
    /// Reach amplitude (metres)
    pub reach_amplitude_m: f64,
    /// Phase offset (radians), lets two hands differ
    pub phase: f64,
}

impl SyntheticHand {
    /// A hand with a 5 Hz resting tremor
    pub fn new(origin: Vector3<f64>) -> Self {
        Self {
            origin,
            tremor_hz: 5.0,
            tremor_amplitude_deg: 2.0,
            tremor_displacement_m: 0.004,
            reach_hz: 0.25,
            reach_amplitude_m: 0.15,
            phase: 0.0,
        }
    }

    pub fn with_tremor(mut self, hz: f64, amplitude_deg: f64) -> Self {
        self.tremor_hz = hz;
        self.tremor_amplitude_deg = amplitude_deg;
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Pose at time `t` seconds
    pub fn pose_at(&self, t: f64) -> (Vector3<f64>, Orientation) {
        let tremor = (TAU * self.tremor_hz * t + self.phase).sin();
        let reach = (TAU * self.reach_hz * t).sin();

        let position = self.origin
            + Vector3::new(
                self.reach_amplitude_m * reach,
                self.tremor_displacement_m * tremor,
                0.5 * self.reach_amplitude_m * reach.abs(),
            );
        let orientation = Orientation::euler(self.tremor_amplitude_deg * tremor, 10.0 * reach, 0.0);

        (position, orientation)
    }

    /// Peak angular velocity of the tremor component (deg/s)
    pub fn peak_tremor_velocity(&self) -> f64 {
        self.tremor_amplitude_deg * TAU * self.tremor_hz
    }
}
