//! # SchoolPulse Testing
//!
//! Testing utilities and helpers for the SchoolPulse session store.
//!
//! This crate provides:
//! - A controllable [`MockClock`] for driving expiry without sleeping
//! - Fixtures and a pre-wired store for tests
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use chrono::Duration;
//! use schoolpulse_testing::helpers::test_store;
//!
//! let (store, clock) = test_store();
//! let token = store.create_session("parent1", ["stu1"]).expect("create");
//!
//! clock.advance(Duration::minutes(31));
//! assert!(store.validate_session(token.as_str()).is_none());
//! ```

use chrono::{DateTime, Duration, Utc};
use schoolpulse_session::environment::Clock;

/// Mock implementations of injected dependencies.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Controllable clock for deterministic tests
    ///
    /// Returns the same time until a test moves it. Clones share the same
    /// time, so a test can keep one handle while the store owns another.
    ///
    /// # Example
    ///
    /// ```
    /// use schoolpulse_testing::mocks::MockClock;
    /// use schoolpulse_session::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = MockClock::new(start);
    /// let handle = clock.clone();
    ///
    /// handle.advance(Duration::minutes(5));
    /// assert_eq!(clock.now(), start + Duration::minutes(5));
    /// ```
    #[derive(Debug, Clone)]
    pub struct MockClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl MockClock {
        /// Create a new clock stopped at the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock to `time` (may go backwards)
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }

        /// Move the clock forward by `by`
        pub fn advance(&self, by: Duration) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) += by;
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> MockClock {
        MockClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and fixtures.
pub mod helpers {
    use super::mocks::{MockClock, test_clock};
    use schoolpulse_session::{SessionConfig, SessionStore};
    use tracing_subscriber::EnvFilter;

    /// Parent and students used across the session tests.
    #[must_use]
    pub fn parent_fixture() -> (&'static str, Vec<String>) {
        ("parent1", vec!["stu1".to_string(), "stu2".to_string()])
    }

    /// Store with the default configuration, driven by [`test_clock`].
    ///
    /// # Panics
    ///
    /// Never in practice: the default configuration always validates.
    #[must_use]
    pub fn test_store() -> (SessionStore<MockClock>, MockClock) {
        test_store_with(SessionConfig::default())
    }

    /// Store with a custom configuration, driven by [`test_clock`].
    ///
    /// # Panics
    ///
    /// Panics if `config` fails validation.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_store_with(config: SessionConfig) -> (SessionStore<MockClock>, MockClock) {
        let clock = test_clock();
        let store = SessionStore::with_clock(config, clock.clone())
            .expect("test configuration should be valid");
        (store, clock)
    }

    /// Install a fmt subscriber for test output.
    ///
    /// Honors `RUST_LOG`, defaulting to debug output for the session crate.
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("schoolpulse_session=debug"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Non-blank user identifiers.
    pub fn user_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,15}"
    }

    /// Non-empty, ordered student lists.
    pub fn allowed_students() -> impl Strategy<Value = Vec<String>> {
        vec("[A-Za-z][A-Za-z0-9]{0,11}", 1..5)
    }

    /// Minutes of inactivity, from none to well past the default timeout.
    pub fn idle_minutes() -> impl Strategy<Value = i64> {
        0_i64..90
    }
}

// Re-export commonly used items
pub use helpers::{init_test_tracing, parent_fixture, test_store, test_store_with};
pub use mocks::{MockClock, test_clock};
