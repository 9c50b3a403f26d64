//! W3C WebDriver backend built on fantoccini.
//!
//! fantoccini is async; this backend owns a current-thread tokio runtime and
//! blocks on every command so the rest of the crate stays synchronous.

use super::{ActionChain, Driver, ElementHandle, PointerAction};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Strategy};
use crate::result::{ProbeError, ProbeResult};
use fantoccini::actions::{
    InputSource, MouseActions, PointerAction as WirePointerAction, MOUSE_BUTTON_LEFT,
};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

fn command_error(err: CmdError) -> ProbeError {
    ProbeError::driver(err.to_string())
}

fn wire_locator(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator.strategy() {
        Strategy::Id => fantoccini::Locator::Id(locator.selector()),
        Strategy::Css => fantoccini::Locator::Css(locator.selector()),
        Strategy::XPath => fantoccini::Locator::XPath(locator.selector()),
    }
}

/// Wire elements keyed by their WebDriver element id.
///
/// Looking the same node up again reuses its entry, so the map holds at most
/// one entry per node seen since the last navigation.
#[derive(Debug)]
struct Registry<E> {
    elements: HashMap<String, E>,
}

impl<E: Clone> Registry<E> {
    fn new() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }

    fn register(&mut self, id: String, element: E) -> ElementHandle {
        let _ = self.elements.insert(id.clone(), element);
        ElementHandle::new(id)
    }

    fn get(&self, handle: &ElementHandle) -> ProbeResult<E> {
        self.elements
            .get(&handle.id)
            .cloned()
            .ok_or_else(|| ProbeError::driver(format!("stale element reference: {}", handle.id)))
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn len(&self) -> usize {
        self.elements.len()
    }
}

/// Live browser session over WebDriver
pub struct WebDriverSession {
    runtime: Runtime,
    client: Option<Client>,
    /// Emptied on navigation
    elements: RefCell<Registry<Element>>,
}

impl fmt::Debug for WebDriverSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverSession")
            .field("open", &self.client.is_some())
            .field("elements", &self.elements.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WebDriverSession {
    /// Start a new browser session against the configured WebDriver server
    pub fn connect(config: &SuiteConfig) -> ProbeResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProbeError::Launch {
                message: e.to_string(),
            })?;

        info!(
            browser = %config.browser,
            url = %config.webdriver_url,
            headless = config.headless,
            "starting WebDriver session"
        );

        let capabilities = config.browser.capabilities(config.headless);
        let client = runtime
            .block_on(
                ClientBuilder::native()
                    .capabilities(capabilities)
                    .connect(&config.webdriver_url),
            )
            .map_err(|e| ProbeError::Launch {
                message: format!("{} at {}: {e}", config.browser, config.webdriver_url),
            })?;

        Ok(Self {
            runtime,
            client: Some(client),
            elements: RefCell::new(Registry::new()),
        })
    }

    fn client(&self) -> ProbeResult<&Client> {
        self.client.as_ref().ok_or(ProbeError::SessionClosed)
    }

    fn register(&self, elements: Vec<Element>) -> Vec<ElementHandle> {
        let mut registry = self.elements.borrow_mut();
        elements
            .into_iter()
            .map(|element| registry.register(element.element_id().to_string(), element))
            .collect()
    }

    fn resolve(&self, handle: &ElementHandle) -> ProbeResult<Element> {
        self.elements.borrow().get(handle)
    }
}

impl Driver for WebDriverSession {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        debug!(url, "navigate");
        self.elements.borrow_mut().clear();
        let client = self.client()?;
        self.runtime
            .block_on(client.goto(url))
            .map_err(|e| ProbeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn current_url(&self) -> ProbeResult<String> {
        let client = self.client()?;
        let url = self
            .runtime
            .block_on(client.current_url())
            .map_err(command_error)?;
        Ok(url.to_string())
    }

    fn find_all(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        let client = self.client()?;
        let found = self
            .runtime
            .block_on(client.find_all(wire_locator(locator)))
            .map_err(command_error)?;
        Ok(self.register(found))
    }

    fn find_all_in(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<Vec<ElementHandle>> {
        let parent = self.resolve(parent)?;
        let found = self
            .runtime
            .block_on(parent.find_all(wire_locator(locator)))
            .map_err(command_error)?;
        Ok(self.register(found))
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let element = self.resolve(element)?;
        self.runtime
            .block_on(element.text())
            .map_err(command_error)
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
        let element = self.resolve(element)?;
        self.runtime
            .block_on(element.attr(name))
            .map_err(command_error)
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        let element = self.resolve(element)?;
        self.runtime
            .block_on(element.is_displayed())
            .map_err(command_error)
    }

    fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let element = self.resolve(element)?;
        self.runtime
            .block_on(element.click())
            .map_err(command_error)
    }

    fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        let element = self.resolve(element)?;
        self.runtime
            .block_on(element.clear())
            .map_err(command_error)
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let element = self.resolve(element)?;
        self.runtime
            .block_on(element.send_keys(text))
            .map_err(command_error)
    }

    fn execute_script(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value> {
        let client = self.client()?;
        let args = args
            .iter()
            .map(|handle| Ok(serde_json::to_value(self.resolve(handle)?)?))
            .collect::<ProbeResult<Vec<_>>>()?;
        self.runtime
            .block_on(client.execute(script, args))
            .map_err(command_error)
    }

    fn perform(&self, chain: &ActionChain) -> ProbeResult<()> {
        let client = self.client()?;
        let mut mouse = MouseActions::new("mouse".to_string());
        for action in chain.actions() {
            mouse = match action {
                PointerAction::MoveTo(handle) => mouse.then(WirePointerAction::MoveToElement {
                    element: self.resolve(handle)?,
                    duration: None,
                    x: Default::default(),
                    y: Default::default(),
                }),
                PointerAction::Click => mouse
                    .then(WirePointerAction::Down {
                        button: MOUSE_BUTTON_LEFT,
                    })
                    .then(WirePointerAction::Up {
                        button: MOUSE_BUTTON_LEFT,
                    }),
                PointerAction::DoubleClick => mouse
                    .then(WirePointerAction::Down {
                        button: MOUSE_BUTTON_LEFT,
                    })
                    .then(WirePointerAction::Up {
                        button: MOUSE_BUTTON_LEFT,
                    })
                    .then(WirePointerAction::Down {
                        button: MOUSE_BUTTON_LEFT,
                    })
                    .then(WirePointerAction::Up {
                        button: MOUSE_BUTTON_LEFT,
                    }),
            };
        }
        self.runtime
            .block_on(client.perform_actions(mouse))
            .map_err(command_error)
    }

    fn close(&mut self) -> ProbeResult<()> {
        self.elements.borrow_mut().clear();
        match self.client.take() {
            Some(client) => {
                info!("closing WebDriver session");
                self.runtime.block_on(client.close()).map_err(command_error)
            }
            None => Ok(()),
        }
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close WebDriver session");
        }
    }
}
