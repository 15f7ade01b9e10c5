//! Environment helpers used by the configuration layers

use std::time::Duration;

/// Read a non-empty environment variable
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read a whole number of seconds from an environment variable
///
/// Returns `None` when the variable is unset, empty or not a number.
pub fn env_duration_secs(key: &str) -> Option<Duration> {
    env_string(key)?.parse::<u64>().ok().map(Duration::from_secs)
}
