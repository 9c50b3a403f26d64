//! Pre-populated TodoMVC lists for scenarios.

use crate::ember_page::EmberTodoPage;
use pageprobe::{Driver, Fixture, PageObject, ProbeResult};
use tracing::debug;

/// How many items of each kind to create before a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoSeed {
    /// Items left active, named `active-{i}`
    pub active: usize,
    /// Items toggled to completed, named `completed-{i}`
    pub completed: usize,
}

impl TodoSeed {
    /// Seed with `active` active and `completed` completed items
    #[must_use]
    pub const fn new(active: usize, completed: usize) -> Self {
        Self { active, completed }
    }

    /// Name of the `i`-th active item
    #[must_use]
    pub fn active_name(i: usize) -> String {
        format!("active-{i}")
    }

    /// Name of the `i`-th completed item
    #[must_use]
    pub fn completed_name(i: usize) -> String {
        format!("completed-{i}")
    }

    /// Add the items to an open page: active ones first, then each
    /// completed one added and toggled in turn.
    pub fn apply<D: Driver>(&self, page: &EmberTodoPage<D>) -> ProbeResult<()> {
        debug!(active = self.active, completed = self.completed, "seeding todos");
        for i in 0..self.active {
            page.add_todo(&Self::active_name(i))?;
        }
        for i in 0..self.completed {
            let name = Self::completed_name(i);
            page.add_todo(&name)?;
            let item = page.find_todo_by_text(&name)?;
            page.toggle_active(&item)?;
        }
        Ok(())
    }
}

/// Opens the Ember page, seeds it, and closes the session on teardown.
///
/// Wrap it in [`pageprobe::FixtureGuard`] so teardown runs however the
/// scenario ends.
#[derive(Debug)]
pub struct TodoPageFixture<D: Driver> {
    /// Page under test
    pub page: EmberTodoPage<D>,
    seed: TodoSeed,
}

impl<D: Driver> TodoPageFixture<D> {
    /// Fixture over `page` with the given seed
    pub const fn new(page: EmberTodoPage<D>, seed: TodoSeed) -> Self {
        Self { page, seed }
    }

    /// Seed applied during setup
    #[must_use]
    pub const fn seed(&self) -> TodoSeed {
        self.seed
    }
}

impl<D: Driver> Fixture for TodoPageFixture<D> {
    fn setup(&mut self) -> ProbeResult<()> {
        self.page.open()?;
        self.seed.apply(&self.page)
    }

    fn teardown(&mut self) -> ProbeResult<()> {
        self.page.close()
    }

    fn name(&self) -> &str {
        "TodoPageFixture"
    }
}
