//! Deterministic fixed-timestep timing
//!
//! Capture runs on a fixed-rate loop, so all timing is derived from tick
//! counts rather than the wall clock:
//! - Tick duration is fixed for a session
//! - Elapsed time is `ticks * tick_duration`
//! - Countdowns expire on an exact tick

pub mod timestep;

pub use timestep::{Countdown, FixedTimestep, DEFAULT_TICK_DURATION};
