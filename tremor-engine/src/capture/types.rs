//! Core types for motion capture
//!
//! Defines the per-tick sample, the orientation representations accepted
//! from the engine, and the metric derived from two consecutive samples.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Orientation of a tracked body part as supplied by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    /// Euler angles in degrees (x = pitch, y = yaw, z = roll)
    Euler(Vector3<f64>),
    /// Unit quaternion
    Quaternion(UnitQuaternion<f64>),
}

impl Orientation {
    /// Build from Euler angles in degrees
    pub fn euler(x: f64, y: f64, z: f64) -> Self {
        Orientation::Euler(Vector3::new(x, y, z))
    }

    /// Identity rotation
    pub fn identity() -> Self {
        Orientation::Quaternion(UnitQuaternion::identity())
    }

    /// Euler angles in degrees, each normalized to \[0, 360).
    ///
    /// Quaternions are decomposed in Z-X-Y order (roll, then pitch, then yaw),
    /// the convention used by the headset engine for its `eulerAngles`.
    pub fn euler_degrees(&self) -> Vector3<f64> {
        match self {
            Orientation::Euler(angles) => angles.map(normalize_degrees),
            Orientation::Quaternion(q) => {
                let c = &q.quaternion().coords;
                let (x, y, z, w) = (c[0], c[1], c[2], c[3]);

                let sin_pitch = (2.0 * (w * x - y * z)).clamp(-1.0, 1.0);
                let pitch = sin_pitch.asin();
                let yaw = (2.0 * (w * y + x * z)).atan2(1.0 - 2.0 * (x * x + y * y));
                let roll = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (x * x + z * z));

                Vector3::new(pitch, yaw, roll).map(|r| normalize_degrees(r.to_degrees()))
            }
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<UnitQuaternion<f64>> for Orientation {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Orientation::Quaternion(q)
    }
}

/// Normalize an angle in degrees to \[0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed difference from `current` to `target` in degrees.
///
/// Result lies in (-180, 180].
pub fn delta_angle(current: f64, target: f64) -> f64 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// One capture tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// World-space position (metres)
    pub position: Vector3<f64>,
    /// Orientation at this tick
    pub orientation: Orientation,
    /// Fixed tick duration (seconds)
    pub tick_duration: f64,
}

impl Sample {
    pub fn new(position: Vector3<f64>, orientation: Orientation, tick_duration: f64) -> Self {
        Self {
            position,
            orientation,
            tick_duration,
        }
    }
}

/// Metric derived from a pair of consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetric {
    /// Position delta magnitude over tick duration (m/s)
    pub linear_velocity: f64,
    /// Signed per-axis angular velocity (deg/s)
    pub angular_velocity: Vector3<f64>,
    /// Magnitude of the angular velocity (deg/s)
    pub shake_magnitude: f64,
}

impl DerivedMetric {
    /// Derive the metric moving from `previous` to `current` over `tick_duration` seconds.
    ///
    /// A zero or non-finite tick duration yields a zero metric.
    pub fn between(previous: &Sample, current: &Sample, tick_duration: f64) -> Self {
        if !tick_duration.is_finite() || tick_duration <= 0.0 {
            return Self::zero();
        }

        let linear_velocity = (current.position - previous.position).norm() / tick_duration;

        let last = previous.orientation.euler_degrees();
        let now = current.orientation.euler_degrees();
        let angular_velocity = Vector3::new(
            delta_angle(last.x, now.x),
            delta_angle(last.y, now.y),
            delta_angle(last.z, now.z),
        ) / tick_duration;

        Self {
            linear_velocity,
            angular_velocity,
            shake_magnitude: angular_velocity.norm(),
        }
    }

    /// Metric with every component zero
    pub fn zero() -> Self {
        Self {
            linear_velocity: 0.0,
            angular_velocity: Vector3::zeros(),
            shake_magnitude: 0.0,
        }
    }
}

/// Rotation axis used when a single angular component is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    /// Pick this axis' component out of a vector
    #[inline]
    pub fn component(&self, v: &Vector3<f64>) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}
