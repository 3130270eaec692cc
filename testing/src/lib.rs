//! # Todosync Testing
//!
//! Testing utilities and helpers for the todosync reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - A way to drive effects without a running store
//!
//! ## Example
//!
//! ```ignore
//! use todosync_testing::{ReducerTest, assertions};
//!
//! #[test]
//! fn filter_change_is_local() {
//!     ReducerTest::new(TodolistsReducer::new())
//!         .with_env(test_environment())
//!         .given_state(state_with_one_list())
//!         .when_action(TodolistAction::ChangeFilter { id, filter: FilterValue::Completed })
//!         .then_effects(assertions::assert_no_effects)
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use todosync_core::environment::Clock;

/// Given-When-Then reducer harness
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions, effects};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todosync_testing::mocks::FixedClock;
    /// use todosync_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
