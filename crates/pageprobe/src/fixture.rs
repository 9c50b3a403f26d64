//! Test fixture setup and teardown.
//!
//! A [`Fixture`] prepares state before a scenario and releases it after.
//! [`FixtureGuard`] ties teardown to scope exit, so it also runs when an
//! assertion panics halfway through a test.

use crate::result::{ProbeError, ProbeResult};
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

/// Trait for test fixtures that can be set up and torn down.
///
/// # Example
///
/// ```
/// use pageprobe::fixture::{Fixture, FixtureGuard};
/// use pageprobe::ProbeResult;
///
/// #[derive(Default)]
/// struct Counter {
///     value: u32,
/// }
///
/// impl Fixture for Counter {
///     fn setup(&mut self) -> ProbeResult<()> {
///         self.value = 1;
///         Ok(())
///     }
///
///     fn teardown(&mut self) -> ProbeResult<()> {
///         self.value = 0;
///         Ok(())
///     }
/// }
///
/// let guard = FixtureGuard::setup(Counter::default()).unwrap();
/// assert_eq!(guard.value, 1);
/// ```
pub trait Fixture {
    /// Set up the fixture before the scenario runs.
    fn setup(&mut self) -> ProbeResult<()>;

    /// Tear down the fixture after the scenario.
    fn teardown(&mut self) -> ProbeResult<()>;

    /// Fixture name for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// State of a guarded fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Fixture has been set up successfully.
    SetUp,
    /// Fixture has been torn down.
    TornDown,
}

/// Owns a set-up fixture and tears it down exactly once.
#[derive(Debug)]
pub struct FixtureGuard<F: Fixture> {
    fixture: F,
    state: FixtureState,
}

impl<F: Fixture> FixtureGuard<F> {
    /// Run `setup` and guard the fixture.
    ///
    /// If setup fails the fixture is torn down before the error is returned.
    pub fn setup(mut fixture: F) -> ProbeResult<Self> {
        debug!(fixture = fixture.name(), "setup");
        if let Err(e) = fixture.setup() {
            let name = fixture.name().to_string();
            if let Err(teardown) = fixture.teardown() {
                warn!(fixture = %name, error = %teardown, "teardown after failed setup");
            }
            return Err(ProbeError::Fixture {
                message: format!("Fixture '{name}' setup failed: {e}"),
            });
        }
        Ok(Self {
            fixture,
            state: FixtureState::SetUp,
        })
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> FixtureState {
        self.state
    }

    /// Tear down now and report the outcome. Later calls are no-ops.
    pub fn teardown(&mut self) -> ProbeResult<()> {
        if self.state == FixtureState::TornDown {
            return Ok(());
        }
        self.state = FixtureState::TornDown;
        debug!(fixture = self.fixture.name(), "teardown");
        self.fixture.teardown().map_err(|e| ProbeError::Fixture {
            message: format!("Fixture '{}' teardown failed: {e}", self.fixture.name()),
        })
    }
}

impl<F: Fixture> Deref for FixtureGuard<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.fixture
    }
}

impl<F: Fixture> DerefMut for FixtureGuard<F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.fixture
    }
}

impl<F: Fixture> Drop for FixtureGuard<F> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            warn!(error = %e, "fixture teardown failed");
        }
    }
}
