//! Driver seam between page objects and a browser backend.
//!
//! Page objects never talk to a browser directly. They go through the
//! blocking [`Driver`] trait, which has two implementations:
//!
//! - [`WebDriverSession`] drives a real Chrome or Firefox over the W3C
//!   WebDriver protocol (feature `webdriver`)
//! - [`MockDriver`] is an in-memory scripted DOM for unit tests

mod mock;
#[cfg(feature = "webdriver")]
mod webdriver;

pub use mock::{MockDriver, MockElement};
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverSession;

use crate::locator::Locator;
use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};

/// WebDriver key codepoints understood by [`Driver::send_keys`]
pub mod keys {
    /// Enter / Return
    pub const ENTER: char = '\u{E007}';
    /// Backspace
    pub const BACKSPACE: char = '\u{E003}';
    /// Escape
    pub const ESCAPE: char = '\u{E00C}';
}

/// Ephemeral handle to a live DOM node.
///
/// Handles are only valid until the next navigation or structural DOM
/// change; re-resolve through the page's locators instead of caching them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Backend-specific identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One step of a pointer gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerAction {
    /// Move the pointer to the centre of an element
    MoveTo(ElementHandle),
    /// Single left click at the current position
    Click,
    /// Double left click at the current position
    DoubleClick,
}

/// Builder for pointer gestures performed in one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionChain {
    actions: Vec<PointerAction>,
}

impl ActionChain {
    /// Create an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to an element
    #[must_use]
    pub fn move_to(mut self, element: &ElementHandle) -> Self {
        self.actions.push(PointerAction::MoveTo(element.clone()));
        self
    }

    /// Click at the current position
    #[must_use]
    pub fn click(mut self) -> Self {
        self.actions.push(PointerAction::Click);
        self
    }

    /// Move to an element and double-click it
    #[must_use]
    pub fn double_click(self, element: &ElementHandle) -> Self {
        let mut chain = self.move_to(element);
        chain.actions.push(PointerAction::DoubleClick);
        chain
    }

    /// Steps in order
    #[must_use]
    pub fn actions(&self) -> &[PointerAction] {
        &self.actions
    }

    /// Whether the chain has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Blocking browser automation interface.
///
/// Every call blocks the calling thread until the backend answers. Lookups
/// that match nothing return an empty `Vec`, not an error; handles that have
/// gone stale yield [`ProbeError::Driver`](crate::ProbeError::Driver).
pub trait Driver {
    /// Navigate to an absolute URL
    fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Current page URL
    fn current_url(&self) -> ProbeResult<String>;

    /// All elements matching the locator, in document order
    fn find_all(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>>;

    /// All descendants of `parent` matching the locator, in document order
    fn find_all_in(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<Vec<ElementHandle>>;

    /// Rendered text of an element
    fn text(&self, element: &ElementHandle) -> ProbeResult<String>;

    /// Attribute value, `None` when absent
    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>>;

    /// Whether the element is visibly rendered
    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Native click
    fn click(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Clear an editable element
    fn clear(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Type text into an element; [`keys`] codepoints are sent as keys
    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Execute a script with element arguments bound to `arguments[i]`
    fn execute_script(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value>;

    /// Perform a pointer gesture
    fn perform(&self, chain: &ActionChain) -> ProbeResult<()>;

    /// End the browser session
    fn close(&mut self) -> ProbeResult<()>;

    /// First element matching the locator
    fn find(&self, locator: &Locator) -> ProbeResult<Option<ElementHandle>> {
        Ok(self.find_all(locator)?.into_iter().next())
    }

    /// First descendant of `parent` matching the locator
    fn find_in(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<Option<ElementHandle>> {
        Ok(self.find_all_in(parent, locator)?.into_iter().next())
    }
}
