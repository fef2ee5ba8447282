//! Time utilities for safe timestamp handling.
//!
//! Wraps `SystemTime` so clock failures surface as errors instead of panics.

use crate::accessor::error::AccessorError;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds since Unix epoch.
pub(crate) fn current_timestamp() -> Result<i64, AccessorError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AccessorError::ClockError("System time is before Unix epoch".to_string()))
}

/// Check if a timestamp is outside the symmetric window around `current_time`.
///
/// A difference exactly equal to the window is still inside it.
pub(crate) fn is_outside_window(timestamp: i64, current_time: i64, time_window: Duration) -> bool {
    current_time.abs_diff(timestamp) > time_window.as_secs()
}
