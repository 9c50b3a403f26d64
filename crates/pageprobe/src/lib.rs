//! Pageprobe: page-object browser testing.
//!
//! Page objects map symbolic element names to locators and expose
//! user-level actions. Everything that touches the browser goes through the
//! blocking [`Driver`] trait, and readiness is a bounded poll instead of a
//! fixed sleep.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌────────────┐    ┌──────────────┐    ┌───────────┐
//! │ Scenario   │───►│ PageObject │───►│ BasePage     │───►│ Session   │
//! │ (cargo     │    │ (actions)  │    │ (wait, find) │    │ (lazy     │
//! │  test)     │    │            │    │              │    │  Driver)  │
//! └────────────┘    └────────────┘    └──────────────┘    └───────────┘
//! ```
//!
//! Backends: [`driver::WebDriverSession`] (feature `webdriver`) and
//! [`driver::MockDriver`].

#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod fixture;
pub mod locator;
pub mod logging;
pub mod page;
mod result;
pub mod session;
pub mod wait;

pub use config::{Browser, SuiteConfig};
pub use driver::{ActionChain, Driver, ElementHandle};
pub use fixture::{Fixture, FixtureGuard};
pub use locator::{Locator, LocatorMap, Strategy};
pub use page::{BasePage, PageObject};
pub use result::{ProbeError, ProbeResult};
pub use session::Session;
pub use wait::{WaitOptions, WaitResult, Waiter};

#[cfg(feature = "webdriver")]
pub use driver::WebDriverSession;

/// Start a lazy WebDriver session for the configured browser
#[cfg(feature = "webdriver")]
pub fn webdriver_session(config: &SuiteConfig) -> Session<WebDriverSession> {
    let config = config.clone();
    Session::lazy(move || WebDriverSession::connect(&config))
}
