//! Clock abstraction for the traffic baseline recorder.
//!
//! Provides a trait for reading the current wall-clock time in Unix
//! milliseconds, with real and mock implementations for deterministic tests.
//! Millisecond granularity is required because window boundaries and
//! inter-packet latency are both sub-second quantities.

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the current Unix timestamp in milliseconds.
pub trait Clock: Send + Sync {
    /// Returns the current time as Unix milliseconds since epoch.
    fn now_unix_ms(&self) -> u64;
}

/// Real system clock implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64
    }
}

/// Mock clock for testing with a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct MockClock {
    timestamp_ms: u64,
}

impl MockClock {
    /// Create a mock clock with a fixed millisecond timestamp.
    pub fn new(timestamp_ms: u64) -> Self {
        Self { timestamp_ms }
    }
}

impl Clock for MockClock {
    fn now_unix_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

/// Mock clock that auto-advances time on each call.
///
/// Useful for testing time-sensitive loops where the clock needs to progress.
#[derive(Debug)]
pub struct AdvancingClock {
    timestamp_ms: std::sync::atomic::AtomicU64,
    increment_ms: u64,
}

impl AdvancingClock {
    /// Create an advancing clock starting at `timestamp_ms` and incrementing
    /// by `increment_ms` each call.
    pub fn new(timestamp_ms: u64, increment_ms: u64) -> Self {
        Self {
            timestamp_ms: std::sync::atomic::AtomicU64::new(timestamp_ms),
            increment_ms,
        }
    }
}

impl Clock for AdvancingClock {
    fn now_unix_ms(&self) -> u64 {
        self.timestamp_ms
            .fetch_add(self.increment_ms, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_returns_fixed_timestamp() {
        let clock = MockClock::new(1234567890123);
        assert_eq!(clock.now_unix_ms(), 1234567890123);
    }

    #[test]
    fn test_mock_clock_zero_timestamp() {
        let clock = MockClock::new(0);
        assert_eq!(clock.now_unix_ms(), 0);
    }

    #[test]
    fn test_system_clock_returns_reasonable_time() {
        let clock = SystemClock;
        let now = clock.now_unix_ms();

        // Should be after 2020-01-01 (1577836800000 ms)
        assert!(now > 1_577_836_800_000);

        // Should be before 2100-01-01 (4102444800000 ms)
        assert!(now < 4_102_444_800_000);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let t1 = clock.now_unix_ms();
        let t2 = clock.now_unix_ms();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_clock_trait_object() {
        let mock: Box<dyn Clock> = Box::new(MockClock::new(1234567890123));
        assert_eq!(mock.now_unix_ms(), 1234567890123);

        let system: Box<dyn Clock> = Box::new(SystemClock);
        assert!(system.now_unix_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_advancing_clock_increments() {
        let clock = AdvancingClock::new(1000, 250);
        assert_eq!(clock.now_unix_ms(), 1000);
        assert_eq!(clock.now_unix_ms(), 1250);
        assert_eq!(clock.now_unix_ms(), 1500);
    }

    #[test]
    fn test_advancing_clock_zero_increment() {
        let clock = AdvancingClock::new(1000, 0);
        assert_eq!(clock.now_unix_ms(), 1000);
        assert_eq!(clock.now_unix_ms(), 1000);
    }
}
