//! Session context
//!
//! Identity and task counters for one play session. Counters are owned
//! here and handed to the aggregator explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage timestamp format for a session folder
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Apple counters for the picking task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskCounters {
    /// Apples the player picked
    pub apples_picked: u32,
    /// Apples spawned so far
    pub total_apples: u32,
}

impl TaskCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly spawned apple
    pub fn record_spawn(&mut self) {
        self.total_apples = self.total_apples.saturating_add(1);
    }

    /// Record a picked apple
    pub fn record_pick(&mut self) {
        self.apples_picked = self.apples_picked.saturating_add(1);
    }

    /// Fraction of spawned apples that were picked, 0 when none spawned
    pub fn success_rate(&self) -> f64 {
        if self.total_apples == 0 {
            0.0
        } else {
            self.apples_picked as f64 / self.total_apples as f64
        }
    }
}

/// Per-session identity and counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Unique session ID
    pub id: Uuid,
    /// Patient the session belongs to
    pub patient_id: String,
    /// Game (exercise) name
    pub game_name: String,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Task counters
    pub counters: TaskCounters,
}

impl SessionContext {
    /// Create a context starting now with zeroed counters
    pub fn new(patient_id: impl Into<String>, game_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.into(),
            game_name: game_name.into(),
            started_at: Utc::now(),
            counters: TaskCounters::default(),
        }
    }

    /// Override the start time (replays, tests)
    pub fn with_start_time(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Context for the next session, keeping this session's counters
    pub fn carry_forward(&self) -> Self {
        Self {
            counters: self.counters,
            ..Self::new(self.patient_id.clone(), self.game_name.clone())
        }
    }

    /// Zero the counters for a fresh session
    pub fn reset(&mut self) {
        self.counters = TaskCounters::default();
        self.id = Uuid::new_v4();
        self.started_at = Utc::now();
    }

    /// Folder name of this session in the log store
    pub fn session_stamp(&self) -> String {
        self.started_at.format(SESSION_TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_counters() {
        let mut counters = TaskCounters::new();
        counters.record_spawn();
        counters.record_spawn();
        counters.record_pick();
        assert_eq!(counters.total_apples, 2);
        assert_eq!(counters.apples_picked, 1);
        assert!((counters.success_rate() - 0.5).abs() < 1e-12);
        assert_eq!(TaskCounters::new().success_rate(), 0.0);
    }

    #[test]
    fn test_carry_forward_keeps_counters() {
        let mut context = SessionContext::new("patient-7", "AppleGame");
        context.counters.record_spawn();
        context.counters.record_pick();

        let next = context.carry_forward();
        assert_ne!(next.id, context.id);
        assert_eq!(next.counters, context.counters);
        assert_eq!(next.patient_id, "patient-7");
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut context = SessionContext::new("patient-7", "AppleGame");
        let id = context.id;
        context.counters.record_spawn();
        context.reset();
        assert_eq!(context.counters, TaskCounters::default());
        assert_ne!(context.id, id);
    }

    #[test]
    fn test_session_stamp() {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("valid date");
        let context = SessionContext::new("p", "g").with_start_time(start);
        assert_eq!(context.session_stamp(), "2024-03-09_14-05-07");
    }
}
