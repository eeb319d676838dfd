//! Application Layer
//!
//! The `tremor` command-line surface and its TOML configuration.

pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ConfigAction};
pub use config::Config;
