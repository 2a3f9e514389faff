//! Time Provider Abstraction
//!
//! Provides a trait-based abstraction for time operations to enable
//! deterministic testing without thread sleeps. Record provenance stamps
//! (created/edited timestamps) are derived exclusively through this trait.
//!
//! # Examples
//!
//! ```rust
//! use notegrid_core::models::time::{TimeProvider, SystemTimeProvider};
//! use chrono::Utc;
//!
//! let provider = SystemTimeProvider;
//! let now = provider.now();
//! assert!(now <= Utc::now());
//! ```

use chrono::{DateTime, Utc};

/// Human-readable format used for record provenance stamps
pub const PROVENANCE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Trait for providing current time
///
/// This abstraction enables:
/// - Deterministic testing (use `MockTimeProvider`)
/// - Time-based testing without thread sleeps
/// - Easier testing of time-dependent logic
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Current time as epoch milliseconds, used for record ordering
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Current time rendered with [`PROVENANCE_TIME_FORMAT`]
    fn now_stamp(&self) -> String {
        self.now().format(PROVENANCE_TIME_FORMAT).to_string()
    }
}

/// System time provider using actual system clock
///
/// This is the default implementation for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for testing
///
/// Allows setting a specific time for deterministic tests.
///
/// # Examples
///
/// ```rust
/// use notegrid_core::models::time::{TimeProvider, MockTimeProvider};
/// use chrono::{Utc, Duration};
///
/// let mut provider = MockTimeProvider::new();
/// let time1 = provider.now();
///
/// // Advance time by 1 hour
/// provider.advance(Duration::hours(1));
/// let time2 = provider.now();
///
/// assert_eq!(time2 - time1, Duration::hours(1));
/// ```
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_time: DateTime<Utc>,
}

#[cfg(test)]
impl MockTimeProvider {
    /// Create a new mock time provider starting at the current time
    pub fn new() -> Self {
        Self {
            current_time: Utc::now(),
        }
    }

    /// Create a mock time provider with a specific starting time
    pub fn with_time(time: DateTime<Utc>) -> Self {
        Self { current_time: time }
    }

    /// Set the current time to a specific value
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.current_time = time;
    }

    /// Advance time by the given duration
    pub fn advance(&mut self, duration: chrono::Duration) {
        self.current_time += duration;
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.current_time
    }
}

#[cfg(test)]
impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}
