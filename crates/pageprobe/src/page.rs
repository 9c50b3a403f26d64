//! Page Object Model support.
//!
//! [`BasePage`] carries everything page objects share: the session, the
//! page path, the locator map and the readiness wait. Concrete page objects
//! embed a `BasePage` and implement [`PageObject`] to expose it.
//!
//! # Example
//!
//! ```
//! use pageprobe::driver::{MockDriver, MockElement};
//! use pageprobe::locator::{Locator, LocatorMap};
//! use pageprobe::page::BasePage;
//! use pageprobe::session::Session;
//!
//! const SEARCH: Locator = Locator::id("search");
//!
//! let driver = MockDriver::new().with_element(MockElement::new("s", SEARCH));
//! let mut page = BasePage::new("SearchPage", Session::started(driver), "http://localhost")
//!     .with_path("/search")
//!     .with_locators(LocatorMap::new().with("search", SEARCH))
//!     .with_required(&["search"]);
//!
//! page.open(true).unwrap();
//! assert!(page.is_present("search"));
//! ```

use crate::config::SuiteConfig;
use crate::driver::{ActionChain, Driver, ElementHandle};
use crate::locator::{Locator, LocatorMap};
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use crate::wait::{WaitOptions, WaitResult, Waiter};
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Script used by [`BasePage::js_click`]
pub const JS_CLICK_SCRIPT: &str = "arguments[0].click();";

fn displayed<D: Driver>(driver: &D, locator: &Locator) -> ProbeResult<bool> {
    match driver.find(locator)? {
        Some(element) => driver.is_displayed(&element),
        None => Ok(false),
    }
}

/// Shared page behaviour: navigation, readiness and element resolution
#[derive(Debug)]
pub struct BasePage<D: Driver> {
    name: String,
    base_url: String,
    path: String,
    locators: LocatorMap,
    required: Vec<&'static str>,
    wait_options: WaitOptions,
    session: Session<D>,
}

impl<D: Driver> BasePage<D> {
    /// Create a page at path `/` under `base_url`
    pub fn new(name: impl Into<String>, session: Session<D>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            path: "/".to_string(),
            locators: LocatorMap::new(),
            required: Vec::new(),
            wait_options: WaitOptions::default(),
            session,
        }
    }

    /// Create a page using the suite's base URL and wait settings
    pub fn from_config(name: impl Into<String>, session: Session<D>, config: &SuiteConfig) -> Self {
        Self::new(name, session, config.base_url.clone()).with_wait_options(
            WaitOptions::new()
                .with_timeout(config.timeout)
                .with_poll_interval(config.poll_interval),
        )
    }

    /// Set the page path, relative to the base URL
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the locator map
    #[must_use]
    pub fn with_locators(mut self, locators: LocatorMap) -> Self {
        self.locators = locators;
        self
    }

    /// Set the element names that must be present before the page counts as loaded
    #[must_use]
    pub fn with_required(mut self, names: &[&'static str]) -> Self {
        self.required = names.to_vec();
        self
    }

    /// Set wait timeout and polling interval
    #[must_use]
    pub const fn with_wait_options(mut self, options: WaitOptions) -> Self {
        self.wait_options = options;
        self
    }

    /// Page name used in logs and errors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Page path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Required element names
    #[must_use]
    pub fn required_elements(&self) -> &[&'static str] {
        &self.required
    }

    /// Locator map
    #[must_use]
    pub const fn locators(&self) -> &LocatorMap {
        &self.locators
    }

    /// Wait settings
    #[must_use]
    pub const fn wait_options(&self) -> &WaitOptions {
        &self.wait_options
    }

    /// Absolute URL of the page
    pub fn url(&self) -> ProbeResult<String> {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        let joined = format!("{base}/{path}");
        url::Url::parse(&joined).map_err(|e| {
            ProbeError::configuration(format!("invalid page URL '{joined}' for {}: {e}", self.name))
        })?;
        Ok(joined)
    }

    /// Driver, starting the session on first use
    pub fn driver(&self) -> ProbeResult<&D> {
        self.session.driver()
    }

    /// Navigate to the page, optionally waiting for its required elements
    pub fn open(&mut self, wait_for_load: bool) -> ProbeResult<()> {
        let url = self.url()?;
        info!(page = %self.name, %url, "open");
        self.session.driver_mut()?.navigate(&url)?;
        if wait_for_load {
            self.wait_page_to_load(self.wait_options.timeout)?;
        }
        Ok(())
    }

    /// Block until every required element is present, or fail with
    /// [`ProbeError::Timeout`] naming the first element that never appeared.
    ///
    /// The driver is resolved once up front. Session, launch and locator
    /// errors are returned as they are; only a missing element times out.
    pub fn wait_page_to_load(&self, timeout: Duration) -> ProbeResult<()> {
        let driver = self.driver()?;
        let waiter = Waiter::with_options(self.wait_options.with_timeout(timeout));
        for &name in &self.required {
            let locator = self.locator(name)?;
            let fatal = RefCell::new(None);
            let result = waiter.wait_for_function(
                || match displayed(driver, locator) {
                    Ok(shown) => shown,
                    Err(e) if e.is_session_error() => {
                        *fatal.borrow_mut() = Some(e);
                        true
                    }
                    Err(e) => {
                        debug!(page = %self.name, element = name, error = %e, "lookup failed");
                        false
                    }
                },
                name,
            );
            if let Some(e) = fatal.into_inner() {
                return Err(e);
            }
            if let WaitResult::TimedOut { elapsed, .. } = result {
                debug!(page = %self.name, element = name, ?elapsed, "required element missing");
                return Err(ProbeError::Timeout {
                    waiting_for: name.to_string(),
                    page: self.name.clone(),
                    ms: timeout.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Like [`wait_page_to_load`](Self::wait_page_to_load), with a timeout
    /// reported as `Ok(false)`
    pub fn try_is_page_loaded(&self, timeout: Duration) -> ProbeResult<bool> {
        match self.wait_page_to_load(timeout) {
            Ok(()) => Ok(true),
            Err(e) if e.is_timeout() => {
                debug!(page = %self.name, error = %e, "page not loaded");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Non-failing variant of [`wait_page_to_load`](Self::wait_page_to_load).
    ///
    /// Errors other than a timeout also read as `false` and are logged at
    /// warn level.
    pub fn is_page_loaded(&self, timeout: Duration) -> bool {
        self.try_is_page_loaded(timeout).unwrap_or_else(|e| {
            warn!(page = %self.name, error = %e, "page readiness check failed");
            false
        })
    }

    /// Whether the named element exists and is displayed.
    ///
    /// A missing or hidden element is `Ok(false)`; unregistered names and
    /// driver failures are errors.
    pub fn check_present(&self, name: &str) -> ProbeResult<bool> {
        let locator = self.locator(name)?;
        displayed(self.driver()?, locator)
    }

    /// Whether the named element exists and is visibly rendered.
    ///
    /// Unregistered names, missing elements and failed lookups all count as
    /// not present.
    pub fn is_present(&self, name: &str) -> bool {
        self.check_present(name).unwrap_or_else(|e| {
            debug!(page = %self.name, element = name, error = %e, "presence lookup failed");
            false
        })
    }

    /// Locator registered under `name`
    pub fn locator(&self, name: &str) -> ProbeResult<&Locator> {
        self.locators.resolve(name, &self.name)
    }

    /// First element matching the named locator
    pub fn element(&self, name: &str) -> ProbeResult<ElementHandle> {
        let locator = self.locator(name)?;
        self.driver()?
            .find(locator)?
            .ok_or_else(|| ProbeError::not_found(format!("{name} ({locator}) on {}", self.name)))
    }

    /// Every element matching the named locator, possibly none
    pub fn elements(&self, name: &str) -> ProbeResult<Vec<ElementHandle>> {
        let locator = self.locator(name)?;
        self.driver()?.find_all(locator)
    }

    /// First descendant of `parent` matching `locator`
    pub fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<ElementHandle> {
        self.driver()?.find_in(parent, locator)?.ok_or_else(|| {
            let what = format!("{locator} within element {} on {}", parent.id, self.name);
            ProbeError::not_found(what)
        })
    }

    /// Click the named element
    pub fn click(&self, name: &str) -> ProbeResult<()> {
        let element = self.element(name)?;
        debug!(page = %self.name, element = name, "click");
        self.driver()?.click(&element)
    }

    /// Type into the named element
    pub fn send_keys(&self, name: &str, text: &str) -> ProbeResult<()> {
        let element = self.element(name)?;
        self.driver()?.send_keys(&element, text)
    }

    /// Click through script, bypassing overlays that intercept native clicks
    pub fn js_click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let _ = self
            .driver()?
            .execute_script(JS_CLICK_SCRIPT, std::slice::from_ref(element))?;
        Ok(())
    }

    /// Move to the element and double-click it
    pub fn double_click(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.driver()?.perform(&ActionChain::new().double_click(element))
    }

    /// URL the browser is currently on
    pub fn current_url(&self) -> ProbeResult<String> {
        self.driver()?.current_url()
    }

    /// Close the session. Idempotent.
    pub fn close(&mut self) -> ProbeResult<()> {
        self.session.close()
    }

    /// Give up the page and keep its session, e.g. to hand it to the page a
    /// link leads to
    pub fn into_session(self) -> Session<D> {
        self.session
    }
}

/// A page or component in the application under test.
///
/// Implementors embed a [`BasePage`] and get navigation and readiness for
/// free.
pub trait PageObject {
    /// Driver backend
    type Driver: Driver;

    /// Shared page state
    fn base(&self) -> &BasePage<Self::Driver>;

    /// Shared page state, mutably
    fn base_mut(&mut self) -> &mut BasePage<Self::Driver>;

    /// Page name for logging/debugging
    fn page_name(&self) -> &str {
        self.base().name()
    }

    /// Navigate to the page and wait for it to load
    fn open(&mut self) -> ProbeResult<()> {
        self.base_mut().open(true)
    }

    /// Block until the page's required elements are present
    fn wait_page_to_load(&self, timeout: Duration) -> ProbeResult<()> {
        self.base().wait_page_to_load(timeout)
    }

    /// Whether the page loads within the default timeout
    fn is_page_loaded(&self) -> bool {
        let base = self.base();
        base.is_page_loaded(base.wait_options().timeout)
    }

    /// Whether the named element is present and displayed
    fn is_present(&self, name: &str) -> bool {
        self.base().is_present(name)
    }

    /// Close the underlying session
    fn close(&mut self) -> ProbeResult<()> {
        self.base_mut().close()
    }
}
