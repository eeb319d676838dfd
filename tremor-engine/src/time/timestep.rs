//! Fixed Timestep Clock
//!
//! Mirrors the physics step of the engine loop that drives the recorders.
//! Every tick advances time by the same duration, so replaying the same
//! inputs always produces the same session.

/// Default tick duration in seconds (50 Hz engine physics step)
pub const DEFAULT_TICK_DURATION: f64 = 0.02;

/// Smallest tick duration accepted (10 kHz)
pub const MIN_TICK_DURATION: f64 = 1e-4;

/// Largest tick duration accepted (1 Hz)
pub const MAX_TICK_DURATION: f64 = 1.0;

/// Deterministic tick counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    tick_duration: f64,
    ticks: u64,
}

impl FixedTimestep {
    /// Create a clock with the given tick duration in seconds.
    ///
    /// Clamps the duration to \[1e-4, 1.0\]; non-finite values fall back to the default.
    pub fn new(tick_duration: f64) -> Self {
        let tick_duration = if tick_duration.is_finite() {
            tick_duration.clamp(MIN_TICK_DURATION, MAX_TICK_DURATION)
        } else {
            DEFAULT_TICK_DURATION
        };
        Self {
            tick_duration,
            ticks: 0,
        }
    }

    /// Tick duration in seconds
    #[inline]
    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    /// Sampling rate in Hz
    #[inline]
    pub fn rate_hz(&self) -> f64 {
        1.0 / self.tick_duration
    }

    /// Ticks elapsed since creation or the last reset
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one tick, returning the new tick count
    #[inline]
    pub fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// Elapsed time in seconds
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.ticks as f64 * self.tick_duration
    }

    /// Number of whole ticks needed to cover `secs` (rounded up)
    pub fn ticks_for(&self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        // Tolerate float noise such as 30.0 / 0.02 = 1500.0000000000002
        let exact = secs / self.tick_duration;
        let rounded = exact.round();
        if (exact - rounded).abs() < 1e-9 {
            rounded as u64
        } else {
            exact.ceil() as u64
        }
    }

    /// Reset the tick count to zero
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_DURATION)
    }
}

/// Tick-driven countdown for a timed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total_ticks: u64,
    remaining_ticks: u64,
}

impl Countdown {
    /// Create a countdown of `secs` seconds on the given clock
    pub fn new(secs: f64, clock: &FixedTimestep) -> Self {
        let total_ticks = clock.ticks_for(secs);
        Self {
            total_ticks,
            remaining_ticks: total_ticks,
        }
    }

    /// Consume one tick. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining_ticks == 0 {
            return false;
        }
        self.remaining_ticks -= 1;
        self.remaining_ticks == 0
    }

    /// Whether the countdown has run out
    pub fn is_expired(&self) -> bool {
        self.remaining_ticks == 0
    }

    /// Remaining ticks
    pub fn remaining_ticks(&self) -> u64 {
        self.remaining_ticks
    }

    /// Remaining time in seconds
    pub fn remaining_secs(&self, clock: &FixedTimestep) -> f64 {
        self.remaining_ticks as f64 * clock.tick_duration()
    }

    /// Whole seconds shown on the countdown display (rounded up)
    pub fn display_secs(&self, clock: &FixedTimestep) -> u64 {
        let secs = self.remaining_secs(clock);
        // 0.02 * 50 is not exactly 1.0; shave float noise before ceil
        (secs - 1e-9).max(0.0).ceil() as u64
    }

    /// Restart from the full duration
    pub fn restart(&mut self) {
        self.remaining_ticks = self.total_ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tick_duration() {
        let clock = FixedTimestep::default();
        assert_eq!(clock.tick_duration(), 0.02);
        assert!((clock.rate_hz() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_duration_clamped() {
        assert_eq!(FixedTimestep::new(0.0).tick_duration(), MIN_TICK_DURATION);
        assert_eq!(FixedTimestep::new(5.0).tick_duration(), MAX_TICK_DURATION);
        assert_eq!(FixedTimestep::new(f64::NAN).tick_duration(), DEFAULT_TICK_DURATION);
    }

    #[test]
    fn test_advance_and_elapsed() {
        let mut clock = FixedTimestep::new(0.01);
        for _ in 0..250 {
            clock.advance();
        }
        assert_eq!(clock.ticks(), 250);
        assert!((clock.elapsed_secs() - 2.5).abs() < 1e-9);

        clock.reset();
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn test_ticks_for_exact_and_partial() {
        let clock = FixedTimestep::new(0.02);
        assert_eq!(clock.ticks_for(30.0), 1500);
        assert_eq!(clock.ticks_for(0.03), 2);
        assert_eq!(clock.ticks_for(0.0), 0);
        assert_eq!(clock.ticks_for(-1.0), 0);
    }

    #[test]
    fn test_countdown_expires_on_exact_tick() {
        let clock = FixedTimestep::new(0.02);
        let mut countdown = Countdown::new(0.1, &clock);
        assert_eq!(countdown.remaining_ticks(), 5);

        for _ in 0..4 {
            assert!(!countdown.tick());
        }
        assert!(countdown.tick());
        assert!(countdown.is_expired());
        // Further ticks are no-ops
        assert!(!countdown.tick());
    }

    #[test]
    fn test_countdown_display_rounds_up() {
        let clock = FixedTimestep::new(0.02);
        let mut countdown = Countdown::new(2.0, &clock);
        assert_eq!(countdown.display_secs(&clock), 2);

        countdown.tick();
        assert_eq!(countdown.display_secs(&clock), 2);

        for _ in 0..50 {
            countdown.tick();
        }
        assert_eq!(countdown.display_secs(&clock), 1);

        countdown.restart();
        assert_eq!(countdown.remaining_ticks(), 100);
    }
}
