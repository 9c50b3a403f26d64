//! TodoMVC EmberJS example page.

use pageprobe::driver::keys;
use pageprobe::{
    BasePage, Driver, ElementHandle, Locator, LocatorMap, PageObject, ProbeError, ProbeResult,
    Session, SuiteConfig,
};
use tracing::debug;

/// Path of the EmberJS example under the TodoMVC base URL
pub const PATH: &str = "/examples/emberjs/index.html";

/// New item entry field
pub const NEW_TODO_ENTRY: Locator = Locator::id("new-todo");
/// Every item in the current view
pub const TODO_ENTRIES_VISIBLE: Locator = Locator::css("li.ember-view");
/// Active items in the current view
pub const TODO_ENTRIES_ACTIVE: Locator = Locator::css(r#"li.ember-view:not([class*="completed"])"#);
/// Completed items in the current view
pub const TODO_ENTRIES_COMPLETED: Locator = Locator::css("li.ember-view.completed");
/// Mark-all control
pub const TOGGLE_ALL: Locator = Locator::id("toggle-all");
/// Remove-completed control
pub const CLEAR_COMPLETED: Locator = Locator::id("clear-completed");
/// Edit field shown while an item is being edited
pub const TODO_ENTRY_EDITING: Locator = Locator::css("input.edit");
/// "All" filter link
pub const SHOW_ALL: Locator = Locator::xpath(r#"//a[@class="ember-view" and text()="All"]"#);
/// "Active" filter link
pub const SHOW_ACTIVE: Locator = Locator::xpath(r#"//a[@class="ember-view" and text()="Active"]"#);
/// "Completed" filter link
pub const SHOW_COMPLETED: Locator =
    Locator::xpath(r#"//a[@class="ember-view" and text()="Completed"]"#);

/// Item label, scoped to an item
pub const ITEM_TEXT: Locator = Locator::css("label");
/// Item close control, scoped to an item
pub const ITEM_CLOSE: Locator = Locator::css("button.destroy");
/// Item checkbox, scoped to an item
pub const ITEM_CHECKBOX: Locator = Locator::css("input.toggle");

/// Class token carried by completed items
pub const COMPLETED_CLASS: &str = "completed";

/// Whether a `class` attribute value marks an item completed
#[must_use]
pub fn is_completed_class(class: &str) -> bool {
    class.split_whitespace().any(|token| token == COMPLETED_CLASS)
}

/// Page object for the EmberJS TodoMVC app
#[derive(Debug)]
pub struct EmberTodoPage<D: Driver> {
    base: BasePage<D>,
}

impl<D: Driver> EmberTodoPage<D> {
    /// Page name used in logs and errors
    pub const NAME: &'static str = "EmberTodoPage";

    /// Create the page over a session
    pub fn new(session: Session<D>, config: &SuiteConfig) -> Self {
        let locators = LocatorMap::new()
            .with("new_todo_entry", NEW_TODO_ENTRY)
            .with("todo_entries_visible", TODO_ENTRIES_VISIBLE)
            .with("todo_entries_active", TODO_ENTRIES_ACTIVE)
            .with("todo_entries_completed", TODO_ENTRIES_COMPLETED)
            .with("toggle_all", TOGGLE_ALL)
            .with("clear_completed", CLEAR_COMPLETED)
            .with("todo_entry_editing", TODO_ENTRY_EDITING)
            .with("show_all", SHOW_ALL)
            .with("show_active", SHOW_ACTIVE)
            .with("show_completed", SHOW_COMPLETED);
        Self {
            base: BasePage::from_config(Self::NAME, session, config)
                .with_path(PATH)
                .with_locators(locators)
                .with_required(&["new_todo_entry"]),
        }
    }

    /// Type `text` into the entry field and submit it
    pub fn add_todo(&self, text: &str) -> ProbeResult<()> {
        debug!(text, "add todo");
        self.base
            .send_keys("new_todo_entry", &format!("{text}{}", keys::ENTER))
    }

    /// Items in the current view
    pub fn visible_todos(&self) -> ProbeResult<Vec<ElementHandle>> {
        self.base.elements("todo_entries_visible")
    }

    /// Active items in the current view
    pub fn active_todos(&self) -> ProbeResult<Vec<ElementHandle>> {
        self.base.elements("todo_entries_active")
    }

    /// Completed items in the current view
    pub fn completed_todos(&self) -> ProbeResult<Vec<ElementHandle>> {
        self.base.elements("todo_entries_completed")
    }

    /// Number of items in the current view
    pub fn visible_count(&self) -> ProbeResult<usize> {
        Ok(self.visible_todos()?.len())
    }

    /// Number of active items in the current view
    pub fn active_count(&self) -> ProbeResult<usize> {
        Ok(self.active_todos()?.len())
    }

    /// Number of completed items in the current view
    pub fn completed_count(&self) -> ProbeResult<usize> {
        Ok(self.completed_todos()?.len())
    }

    /// Rendered text of an item
    pub fn text_of(&self, item: &ElementHandle) -> ProbeResult<String> {
        self.base.driver()?.text(item)
    }

    /// Text of an item's label
    pub fn todo_text(&self, item: &ElementHandle) -> ProbeResult<String> {
        let label = self.base.find_within(item, &ITEM_TEXT)?;
        self.base.driver()?.text(&label)
    }

    /// First visible item whose text is exactly `text`
    pub fn find_todo_by_text(&self, text: &str) -> ProbeResult<ElementHandle> {
        for item in self.visible_todos()? {
            if self.text_of(&item)? == text {
                return Ok(item);
            }
        }
        Err(ProbeError::not_found(format!("No TODO element found with text '{text}'")))
    }

    /// Flip an item between active and completed
    pub fn toggle_active(&self, item: &ElementHandle) -> ProbeResult<()> {
        let checkbox = self.base.find_within(item, &ITEM_CHECKBOX)?;
        self.base.driver()?.click(&checkbox)
    }

    /// Remove an item with its close control.
    ///
    /// The control only renders on hover, so it is clicked through script.
    pub fn close_todo(&self, item: &ElementHandle) -> ProbeResult<()> {
        let close = self.base.find_within(item, &ITEM_CLOSE)?;
        self.base.js_click(&close)
    }

    /// Whether an item is active, i.e. its class carries no completed marker
    pub fn is_todo_active(&self, item: &ElementHandle) -> ProbeResult<bool> {
        let class = self.base.driver()?.attribute(item, "class")?;
        Ok(!class.as_deref().is_some_and(is_completed_class))
    }

    /// Replace an item's text through the inline editor
    pub fn edit_todo(
        &self,
        item: &ElementHandle,
        new_text: &str,
        clear_existing: bool,
    ) -> ProbeResult<()> {
        debug!(new_text, clear_existing, "edit todo");
        self.base.double_click(item)?;
        let editor = self.base.element("todo_entry_editing")?;
        let driver = self.base.driver()?;
        if clear_existing {
            driver.clear(&editor)?;
        }
        driver.send_keys(&editor, &format!("{new_text}{}", keys::ENTER))
    }

    /// Mark every item completed (or active, if all already are)
    pub fn toggle_all(&self) -> ProbeResult<()> {
        self.base.click("toggle_all")
    }

    /// Remove every completed item
    pub fn clear_completed(&self) -> ProbeResult<()> {
        self.base.click("clear_completed")
    }

    /// Show every item
    pub fn show_all(&self) -> ProbeResult<()> {
        self.base.click("show_all")
    }

    /// Show only active items
    pub fn show_active(&self) -> ProbeResult<()> {
        self.base.click("show_active")
    }

    /// Show only completed items
    pub fn show_completed(&self) -> ProbeResult<()> {
        self.base.click("show_completed")
    }
}

impl<D: Driver> PageObject for EmberTodoPage<D> {
    type Driver = D;

    fn base(&self) -> &BasePage<D> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BasePage<D> {
        &mut self.base
    }
}
