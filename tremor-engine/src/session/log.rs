//! Session Log
//!
//! The durable unit of a session: summary scalars plus the raw series of
//! one channel. Values are already at wire precision, so encoding and
//! decoding a log reproduces it exactly.

use serde::{Deserialize, Serialize};

/// Finalized per-channel session record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionLog {
    /// Logical channel the log came from ("left", "right")
    pub logger_name: String,
    /// Mean linear velocity (m/s, 2 dp)
    pub avg_velocity: f64,
    /// Mean shake magnitude (deg/s, 2 dp)
    pub avg_shake: f64,
    /// Number of samples recorded
    pub points: u64,
    /// Capture-side tremor frequency estimate (Hz)
    pub frequency_hz: f64,
    /// Apples picked during the session
    pub apples_picked: u32,
    /// Apples spawned during the session
    pub total_apples: u32,
    /// Linear velocity per tick (4 dp)
    pub velocity_log: Vec<f64>,
    /// Shake magnitude per tick (4 dp)
    pub shake_log: Vec<f64>,
    /// Positions per tick (3 dp)
    pub positions: Vec<[f64; 3]>,
}

impl SessionLog {
    /// Fraction of spawned apples that were picked, 0 when none spawned
    pub fn success_rate(&self) -> f64 {
        if self.total_apples == 0 {
            0.0
        } else {
            self.apples_picked as f64 / self.total_apples as f64
        }
    }

    /// Whether the log carries no motion data at all
    pub fn has_motion(&self) -> bool {
        !(self.velocity_log.is_empty() && self.shake_log.is_empty() && self.positions.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let log = SessionLog {
            apples_picked: 8,
            total_apples: 10,
            ..Default::default()
        };
        assert!((log.success_rate() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_success_rate_without_apples() {
        assert_eq!(SessionLog::default().success_rate(), 0.0);
    }

    #[test]
    fn test_has_motion() {
        let mut log = SessionLog::default();
        assert!(!log.has_motion());
        log.positions.push([0.0, 1.0, 0.0]);
        assert!(log.has_motion());
    }
}
