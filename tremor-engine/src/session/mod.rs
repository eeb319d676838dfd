//! Session module
//!
//! Everything scoped to one play session: identity and counters, the
//! lifecycle controller, and the aggregation of captures into logs.

pub mod log;
pub mod context;
pub mod aggregator;
pub mod controller;

pub use aggregator::SessionAggregator;
pub use context::{SessionContext, TaskCounters, SESSION_TIMESTAMP_FORMAT};
pub use controller::{SessionController, SessionSettings, SessionState};
pub use log::SessionLog;
