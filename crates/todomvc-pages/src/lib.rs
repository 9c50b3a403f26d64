//! Page objects for the TodoMVC site and its EmberJS example.
//!
//! ```text
//! TodoMvcMainPage ──open_emberjs()──► EmberTodoPage
//!      (/)                              (/examples/emberjs/index.html)
//! ```
//!
//! Both pages share one [`pageprobe::Session`]: follow the link on the main
//! page, then hand its session to the Ember page with
//! [`TodoMvcMainPage::into_session`].
//!
//! # Example
//!
//! ```
//! use pageprobe::driver::{MockDriver, MockElement};
//! use pageprobe::{PageObject, Session, SuiteConfig};
//! use todomvc_pages::{ember_page, EmberTodoPage};
//!
//! let entry = MockElement::new("entry", ember_page::NEW_TODO_ENTRY);
//! let driver = MockDriver::new().with_element(entry);
//! let mut page = EmberTodoPage::new(Session::started(driver), &SuiteConfig::default());
//! page.open().unwrap();
//! page.add_todo("write docs").unwrap();
//! ```

#![warn(missing_docs)]

pub mod ember_page;
pub mod main_page;
pub mod seed;

pub use ember_page::EmberTodoPage;
pub use main_page::TodoMvcMainPage;
pub use seed::{TodoPageFixture, TodoSeed};
