//! In-memory scripted DOM for unit testing page logic without a browser.

use super::{ActionChain, Driver, ElementHandle};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A scripted element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Handle id
    pub id: String,
    /// Locators this element answers to
    pub locators: Vec<Locator>,
    /// Parent element id, for scoped lookups
    pub parent: Option<String>,
    /// Rendered text
    pub text: String,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// Visibly rendered
    pub displayed: bool,
    /// Number of lookups before the element is attached to the DOM
    pub appears_after: usize,
}

impl MockElement {
    /// Create a displayed element matching one locator
    #[must_use]
    pub fn new(id: impl Into<String>, locator: Locator) -> Self {
        Self {
            id: id.into(),
            locators: vec![locator],
            parent: None,
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            appears_after: 0,
        }
    }

    /// Also answer to another locator
    #[must_use]
    pub fn also(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    /// Set the parent element id
    #[must_use]
    pub fn within(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attached but not rendered
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Only attach after this many lookups have run
    #[must_use]
    pub const fn appearing_after(mut self, lookups: usize) -> Self {
        self.appears_after = lookups;
        self
    }
}

/// Mock driver for unit testing.
///
/// Records every command in a shared call history, so assertions still work
/// after the driver has been moved into a session.
#[derive(Debug, Default)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    elements: Vec<MockElement>,
    lookups: Cell<usize>,
    script_result: serde_json::Value,
    closed: bool,
    history: Rc<RefCell<Vec<String>>>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scripted element
    pub fn add_element(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Builder form of [`add_element`](Self::add_element)
    #[must_use]
    pub fn with_element(mut self, element: MockElement) -> Self {
        self.add_element(element);
        self
    }

    /// Set the value returned by `execute_script`
    pub fn set_script_result(&mut self, value: serde_json::Value) {
        self.script_result = value;
    }

    /// Shared call history
    #[must_use]
    pub fn history(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.history)
    }

    /// Check if a command was issued
    #[must_use]
    pub fn was_called(&self, command: &str) -> bool {
        self.history.borrow().iter().any(|c| c.starts_with(command))
    }

    /// Number of lookups served so far
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    /// Scripted element by id
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn record(&self, entry: String) {
        self.history.borrow_mut().push(entry);
    }

    fn ensure_open(&self) -> ProbeResult<()> {
        if self.closed {
            Err(ProbeError::driver("mock session is closed"))
        } else {
            Ok(())
        }
    }

    fn attached(&self, element: &MockElement, lookups: usize) -> bool {
        lookups >= element.appears_after
    }

    fn lookup(&self, handle: &ElementHandle) -> ProbeResult<&MockElement> {
        self.ensure_open()?;
        self.elements
            .iter()
            .find(|e| e.id == handle.id && self.attached(e, self.lookups.get()))
            .ok_or_else(|| ProbeError::driver(format!("stale element reference: {}", handle.id)))
    }

    fn matching<'a>(
        &'a self,
        locator: &'a Locator,
        parent: Option<&'a str>,
    ) -> impl Iterator<Item = ElementHandle> + 'a {
        let lookups = self.lookups.get();
        self.elements
            .iter()
            .filter(move |e| self.attached(e, lookups))
            .filter(move |e| e.locators.contains(locator))
            .filter(move |e| parent.map_or(true, |p| e.parent.as_deref() == Some(p)))
            .map(|e| ElementHandle::new(e.id.clone()))
    }
}

impl Driver for MockDriver {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.ensure_open()?;
        self.record(format!("navigate:{url}"));
        self.current_url = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> ProbeResult<String> {
        self.ensure_open()?;
        Ok(self.current_url.clone())
    }

    fn find_all(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        self.ensure_open()?;
        self.lookups.set(self.lookups.get() + 1);
        self.record(format!("find:{locator}"));
        Ok(self.matching(locator, None).collect())
    }

    fn find_all_in(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<Vec<ElementHandle>> {
        let _ = self.lookup(parent)?;
        self.lookups.set(self.lookups.get() + 1);
        self.record(format!("find_in:{}:{locator}", parent.id));
        Ok(self.matching(locator, Some(&parent.id)).collect())
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        Ok(self.lookup(element)?.text.clone())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
        Ok(self.lookup(element)?.attributes.get(name).cloned())
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.lookup(element)?.displayed)
    }

    fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let _ = self.lookup(element)?;
        self.record(format!("click:{}", element.id));
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        let _ = self.lookup(element)?;
        self.record(format!("clear:{}", element.id));
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let _ = self.lookup(element)?;
        self.record(format!("send_keys:{}:{text}", element.id));
        Ok(())
    }

    fn execute_script(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value> {
        self.ensure_open()?;
        let ids: Vec<&str> = args.iter().map(|a| a.id.as_str()).collect();
        self.record(format!("execute_script:{script}:{}", ids.join(",")));
        Ok(self.script_result.clone())
    }

    fn perform(&self, chain: &ActionChain) -> ProbeResult<()> {
        self.ensure_open()?;
        self.record(format!("perform:{:?}", chain.actions()));
        Ok(())
    }

    fn close(&mut self) -> ProbeResult<()> {
        self.ensure_open()?;
        self.record("close".to_string());
        self.closed = true;
        Ok(())
    }
}
