//! # Volunteer Hub Testing
//!
//! Testing utilities for Volunteer Hub.
//!
//! This crate provides:
//! - Mock implementations of the core's injected dependencies (clocks,
//!   event stores, notifiers)
//! - Fixtures for building events and services
//! - Property-based testing strategies
//! - A Given-When-Then harness for signup scenarios
//!
//! ## Example
//!
//! ```ignore
//! use volunteer_hub_testing::{fixtures, test_clock};
//!
//! #[tokio::test]
//! async fn test_signup_flow() {
//!     let (hub, _store) = fixtures::in_memory_hub(test_clock());
//!     let event = hub.create(fixtures::upcoming_draft("Food Drive", &[("Sorter", 2)])).await?;
//!
//!     let receipt = hub.sign_up(event.id, 0, "Ada", "ada@example.com").await?;
//!     assert_eq!(receipt.event.roles[0].volunteers.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use volunteer_hub_core::environment::Clock;

pub mod fixtures;
pub mod notifier_mocks;
pub mod scenario;
pub mod store_mocks;

/// Mock implementations of the clock.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use volunteer_hub_testing::mocks::FixedClock;
    /// use volunteer_hub_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the service.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Start at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move time forward (or backward, with a negative duration)
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned.
        #[allow(clippy::unwrap_used)]
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap();
            *time += by;
        }

        /// Jump to `time`
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned.
        #[allow(clippy::unwrap_used)]
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap() = time;
        }
    }

    impl Clock for ManualClock {
        #[allow(clippy::unwrap_used)]
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Emails drawn from a small pool, in random letter case.
    ///
    /// The pool is small on purpose so sequences contain repeats.
    pub fn email_in_any_case(pool: usize) -> impl Strategy<Value = String> {
        (0..pool.max(1), any::<bool>()).prop_map(|(person, shout)| {
            let email = format!("volunteer{person}@example.org");
            if shout { email.to_uppercase() } else { email }
        })
    }

    /// Role capacities between 1 and `max`.
    pub fn slot_counts(max_roles: usize, max: u32) -> impl Strategy<Value = Vec<u32>> {
        proptest::collection::vec(1..=max.max(1), 1..=max_roles.max(1))
    }
}

/// Install a `tracing` subscriber writing to the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use notifier_mocks::{FailingNotifier, NoticeKind, RecordingNotifier};
pub use scenario::SignupScenario;
pub use store_mocks::{InterleavingEventStore, StalledEventStore, UnavailableEventStore};
pub use volunteer_hub_core::memory::InMemoryEventStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_manual_clock_shares_time() {
        let clock = ManualClock::new(test_clock().now());
        let handle = clock.clone();

        handle.advance(chrono::Duration::hours(2));
        assert_eq!(clock.now(), test_clock().now() + chrono::Duration::hours(2));

        handle.set(test_clock().now());
        assert_eq!(clock.now(), test_clock().now());
    }
}
