//! Shared utilities for the company insight workspace
//!
//! Logging setup and small helpers for reading configuration from the
//! environment.

pub mod config;
pub mod logging;

pub use config::{env_duration_secs, env_string};
pub use logging::init_tracing_with_default;
