//! # Museum Chat Testing
//!
//! Testing utilities and helpers for the museum chat booking architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Assertion helpers for reducers
//! - A fluent Given-When-Then harness for reducer tests
//!
//! ## Example
//!
//! ```ignore
//! use museum_chat_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(BookingState::new(config))
//!     .when_action(BookingAction::UserMessage { text: "7".into() })
//!     .then_state(|state| assert_eq!(state.step, Step::AwaitingConfirmation))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use museum_chat_core::environment::Clock;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use museum_chat_testing::mocks::FixedClock;
    /// use museum_chat_core::environment::Clock;
    ///
    /// let clock = FixedClock::default();
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Clone, Copy, Debug)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock pinned to the given time
        #[must_use]
        pub const fn at(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Default for FixedClock {
        /// A clock pinned to the Unix epoch
        fn default() -> Self {
            Self {
                time: DateTime::UNIX_EPOCH,
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }
}
