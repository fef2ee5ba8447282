//! Timestamp window policies.

use crate::accessor::error::AccessorError;
use crate::accessor::time_utils::{current_timestamp, is_outside_window};
use std::sync::Arc;
use std::time::Duration;

/// A function that provides the current Unix timestamp in seconds.
pub type TimeProviderFn = Arc<dyn Fn() -> Result<i64, AccessorError> + Send + Sync>;

/// Decides whether a request's parsed timestamp is acceptable.
///
/// Any `Fn(i64) -> Result<(), AccessorError> + Send + Sync` closure
/// qualifies, which makes asymmetric or per-tenant windows a one-liner.
///
/// # Example
///
/// ```rust
/// use api_accessor::{AccessorError, timestamp::TimestampChecker};
///
/// // Only accept requests from the past
/// let not_in_future = |timestamp: i64| {
///     if timestamp <= 1_700_000_000 {
///         Ok(())
///     } else {
///         Err(AccessorError::TimestampTimeout)
///     }
/// };
///
/// assert!(not_in_future.check(1_600_000_000).is_ok());
/// assert!(not_in_future.check(1_800_000_000).is_err());
/// ```
pub trait TimestampChecker: Send + Sync {
    /// Returns `Ok(())` if `timestamp` (seconds since epoch) is acceptable.
    fn check(&self, timestamp: i64) -> Result<(), AccessorError>;
}

impl<F> TimestampChecker for F
where
    F: Fn(i64) -> Result<(), AccessorError> + Send + Sync,
{
    fn check(&self, timestamp: i64) -> Result<(), AccessorError> {
        self(timestamp)
    }
}

/// Default policy: a symmetric window around the current time.
///
/// A request passes when `|now - timestamp| <= time_window`. No further
/// clock-skew compensation is applied.
#[derive(Clone)]
pub struct WindowTimestampChecker {
    time_window: Duration,
    time_provider: TimeProviderFn,
}

impl WindowTimestampChecker {
    /// Creates a checker reading the system clock.
    pub fn new(time_window: Duration) -> Self {
        Self {
            time_window,
            time_provider: Arc::new(current_timestamp),
        }
    }

    /// Replaces the clock source.
    ///
    /// # Example
    ///
    /// ```rust
    /// use api_accessor::timestamp::{TimestampChecker, WindowTimestampChecker};
    /// use std::time::Duration;
    ///
    /// let checker = WindowTimestampChecker::new(Duration::from_secs(60))
    ///     .with_time_provider(|| Ok(1_000));
    ///
    /// assert!(checker.check(1_030).is_ok());
    /// assert!(checker.check(900).is_err());
    /// ```
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<i64, AccessorError> + Send + Sync + 'static,
    {
        self.time_provider = Arc::new(provider);
        self
    }

    /// The configured window.
    pub fn time_window(&self) -> Duration {
        self.time_window
    }
}

impl std::fmt::Debug for WindowTimestampChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowTimestampChecker")
            .field("time_window", &self.time_window)
            .finish_non_exhaustive()
    }
}

impl TimestampChecker for WindowTimestampChecker {
    fn check(&self, timestamp: i64) -> Result<(), AccessorError> {
        let now = (self.time_provider)()?;
        if is_outside_window(timestamp, now, self.time_window) {
            tracing::debug!(
                timestamp,
                now,
                window_secs = self.time_window.as_secs(),
                "timestamp outside allowed window"
            );
            return Err(AccessorError::TimestampTimeout);
        }
        Ok(())
    }
}
