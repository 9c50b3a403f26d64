//! Bounded polling waits.
//!
//! Client-side rendering makes element appearance non-deterministic, so
//! readiness is a poll loop with a deadline instead of a fixed sleep. The
//! loop runs on the calling thread and cannot be interrupted before its
//! timeout.

use crate::config::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
use std::time::{Duration, Instant};

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Sleep between checks
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Trait for custom wait conditions
pub trait WaitCondition {
    /// Check if the condition is satisfied
    fn check(&self) -> bool;

    /// Get description for error messages
    fn description(&self) -> String;
}

/// A function-based wait condition
pub struct FnCondition<F: Fn() -> bool> {
    func: F,
    description: String,
}

impl<F: Fn() -> bool> std::fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F: Fn() -> bool> FnCondition<F> {
    /// Create a new function condition
    pub fn new(func: F, description: impl Into<String>) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl<F: Fn() -> bool> WaitCondition for FnCondition<F> {
    fn check(&self) -> bool {
        (self.func)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Outcome of a wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitResult {
    /// Condition held before the deadline
    Satisfied {
        /// Time spent waiting
        elapsed: Duration,
        /// What was waited for
        waited_for: String,
    },
    /// Deadline passed first
    TimedOut {
        /// Time spent waiting
        elapsed: Duration,
        /// What was waited for
        waited_for: String,
    },
}

impl WaitResult {
    /// Whether the condition held
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// Time spent waiting
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Satisfied { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    /// What was waited for
    #[must_use]
    pub fn waited_for(&self) -> &str {
        match self {
            Self::Satisfied { waited_for, .. } | Self::TimedOut { waited_for, .. } => waited_for,
        }
    }
}

/// Synchronous poller
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a new waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait for a custom condition
    pub fn wait_for<C: WaitCondition>(&self, condition: &C) -> WaitResult {
        self.wait_for_function(|| condition.check(), condition.description())
    }

    /// Poll `predicate` until it returns true or the timeout elapses.
    ///
    /// The predicate is always checked at least once, and once more at the
    /// deadline, so a zero timeout still observes the current state.
    pub fn wait_for_function<F>(&self, predicate: F, waited_for: impl Into<String>) -> WaitResult
    where
        F: Fn() -> bool,
    {
        let waited_for = waited_for.into();
        let start = Instant::now();
        let deadline = start + self.options.timeout;

        loop {
            if predicate() {
                return WaitResult::Satisfied {
                    elapsed: start.elapsed(),
                    waited_for,
                };
            }
            let now = Instant::now();
            if now >= deadline {
                return WaitResult::TimedOut {
                    elapsed: start.elapsed(),
                    waited_for,
                };
            }
            std::thread::sleep(self.options.poll_interval.min(deadline - now));
        }
    }
}

/// Wait for a condition with default polling
pub fn wait_until<F>(predicate: F, timeout: Duration) -> WaitResult
where
    F: Fn() -> bool,
{
    Waiter::with_options(WaitOptions::new().with_timeout(timeout))
        .wait_for_function(predicate, "custom function")
}
