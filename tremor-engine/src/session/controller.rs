//! Session Controller
//!
//! Owns the timed game lifecycle: opening and closing the logging gate,
//! the countdown, apple spawning and hit registration, and finalizing one
//! log per tracked hand when time runs out.

use super::aggregator::SessionAggregator;
use super::context::SessionContext;
use super::log::SessionLog;
use crate::capture::{LoggingGate, Orientation, SampleRecorder};
use crate::time::{Countdown, FixedTimestep};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Default session length (seconds)
pub const DEFAULT_SESSION_SECS: f64 = 30.0;

/// Apples spawned when a session starts
pub const DEFAULT_INITIAL_APPLES: u32 = 3;

/// Minimum impact speed that picks an apple (m/s)
pub const DEFAULT_PUNCH_THRESHOLD: f64 = 2.0;

/// Session lifecycle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session length (seconds)
    pub duration_secs: f64,
    /// Apples spawned at start
    pub initial_apples: u32,
    /// Minimum impact speed that picks an apple (m/s)
    pub punch_threshold: f64,
    /// Tracked channels, one recorder each
    pub channels: Vec<String>,
    /// Keep apple counters from the previous session
    pub carry_counters: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SESSION_SECS,
            initial_apples: DEFAULT_INITIAL_APPLES,
            punch_threshold: DEFAULT_PUNCH_THRESHOLD,
            channels: vec!["left".to_string(), "right".to_string()],
            carry_counters: false,
        }
    }
}

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started yet
    Idle,
    /// Gate open, countdown running
    Running,
    /// Countdown expired, logs finalized
    Finished,
}

/// Drives one session at a time
#[derive(Debug)]
pub struct SessionController {
    settings: SessionSettings,
    gate: LoggingGate,
    clock: FixedTimestep,
    countdown: Countdown,
    context: SessionContext,
    recorders: Vec<SampleRecorder>,
    aggregator: SessionAggregator,
    state: SessionState,
}

impl SessionController {
    /// Create an idle controller
    pub fn new(settings: SessionSettings, context: SessionContext, clock: FixedTimestep) -> Self {
        let gate = LoggingGate::new();
        let recorders = settings
            .channels
            .iter()
            .map(|channel| SampleRecorder::new(channel.clone(), gate.clone()))
            .collect();
        let countdown = Countdown::new(settings.duration_secs, &clock);

        Self {
            settings,
            gate,
            clock,
            countdown,
            context,
            recorders,
            aggregator: SessionAggregator::new(),
            state: SessionState::Idle,
        }
    }

    /// Replace the aggregator (custom frequency estimator)
    pub fn with_aggregator(mut self, aggregator: SessionAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Replace every recorder's large-shake threshold (deg/s)
    pub fn with_large_shake_threshold(mut self, threshold: f64) -> Self {
        self.recorders = std::mem::take(&mut self.recorders)
            .into_iter()
            .map(|r| r.with_large_shake_threshold(threshold))
            .collect();
        self
    }

    /// Open the gate, restart the countdown and spawn the initial apples
    pub fn start(&mut self) -> crate::Result<()> {
        if self.state == SessionState::Running {
            return Err(crate::Error::Session("session already running".into()));
        }
        let duration = self.settings.duration_secs;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(crate::Error::Session(format!(
                "session duration must be a positive number of seconds, got {}",
                duration
            )));
        }
        if self.state == SessionState::Finished {
            self.prepare_next();
        }

        for recorder in &mut self.recorders {
            recorder.reset();
        }
        self.clock.reset();
        self.countdown = Countdown::new(self.settings.duration_secs, &self.clock);
        for _ in 0..self.settings.initial_apples {
            self.context.counters.record_spawn();
        }

        self.gate.activate();
        self.state = SessionState::Running;

        tracing::info!(
            session = %self.context.id,
            patient = %self.context.patient_id,
            game = %self.context.game_name,
            duration_secs = self.settings.duration_secs,
            "Session started"
        );
        Ok(())
    }

    /// Advance one fixed tick with one pose per channel.
    ///
    /// Returns the finalized logs on the tick the countdown expires.
    pub fn tick(
        &mut self,
        poses: &[(Vector3<f64>, Orientation)],
    ) -> crate::Result<Option<Vec<SessionLog>>> {
        if poses.len() != self.recorders.len() {
            return Err(crate::Error::Capture(format!(
                "expected {} poses, got {}",
                self.recorders.len(),
                poses.len()
            )));
        }
        if self.state != SessionState::Running {
            return Ok(None);
        }

        let dt = self.clock.tick_duration();
        for (recorder, (position, orientation)) in self.recorders.iter_mut().zip(poses) {
            recorder.tick(*position, *orientation, dt);
        }
        self.clock.advance();

        if self.countdown.tick() {
            return Ok(Some(self.end()));
        }
        Ok(None)
    }

    /// Register an apple collision. Counts a pick and respawns when the
    /// impact speed reaches the punch threshold.
    pub fn register_hit(&mut self, impact_speed: f64) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        tracing::debug!(impact_speed, "Apple hit");
        if impact_speed < self.settings.punch_threshold || impact_speed.is_nan() {
            return false;
        }
        self.context.counters.record_pick();
        self.context.counters.record_spawn();
        true
    }

    /// Close the gate and finalize one log per channel
    pub fn end(&mut self) -> Vec<SessionLog> {
        self.gate.deactivate();
        self.state = SessionState::Finished;

        let counters = self.context.counters;
        let logs: Vec<SessionLog> = self
            .recorders
            .iter_mut()
            .map(|recorder| self.aggregator.finalize(&recorder.take_capture(), &counters))
            .collect();

        tracing::info!(
            session = %self.context.id,
            apples_picked = counters.apples_picked,
            total_apples = counters.total_apples,
            elapsed_secs = self.clock.elapsed_secs(),
            "Session ended"
        );
        logs
    }

    fn prepare_next(&mut self) {
        if self.settings.carry_counters {
            self.context = self.context.carry_forward();
        } else {
            self.context.reset();
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn gate(&self) -> &LoggingGate {
        &self.gate
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Channel names in pose order
    pub fn channels(&self) -> Vec<&str> {
        self.recorders.iter().map(|r| r.channel()).collect()
    }

    /// Whole seconds left on the countdown display
    pub fn remaining_display_secs(&self) -> u64 {
        self.countdown.display_secs(&self.clock)
    }

    /// Seconds of session time elapsed
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }
}
