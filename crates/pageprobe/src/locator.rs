//! Locator declarations for page objects.
//!
//! A [`Locator`] is an immutable `(strategy, selector)` pair. Page objects
//! declare them as `const` items and bind them to symbolic names in a
//! [`LocatorMap`], which is the only way a page turns a name into a live
//! element.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Strategy used to resolve a selector against the live page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Element `id` attribute
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// W3C WebDriver strategy name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css selector",
            Self::XPath => "xpath",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(strategy, selector)` pair.
///
/// ```
/// use pageprobe::locator::{Locator, Strategy};
///
/// const NEW_TODO: Locator = Locator::id("new-todo");
/// assert_eq!(NEW_TODO.strategy(), Strategy::Id);
/// assert_eq!(NEW_TODO.selector(), "new-todo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    selector: Cow<'static, str>,
}

impl Locator {
    /// Locate by element id
    #[must_use]
    pub const fn id(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::Id,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::Css,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Build a locator from an owned selector string
    #[must_use]
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: Cow::Owned(selector.into()),
        }
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}

/// Name → locator bindings for one page
#[derive(Debug, Clone, Default)]
pub struct LocatorMap {
    locators: HashMap<&'static str, Locator>,
}

impl LocatorMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a locator
    #[must_use]
    pub fn with(mut self, name: &'static str, locator: Locator) -> Self {
        self.insert(name, locator);
        self
    }

    /// Bind a name to a locator, replacing any previous binding
    pub fn insert(&mut self, name: &'static str, locator: Locator) {
        let _ = self.locators.insert(name, locator);
    }

    /// Look up a locator by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Locator> {
        self.locators.get(name)
    }

    /// Resolve a name, failing with [`ProbeError::UnknownLocator`]
    pub fn resolve(&self, name: &str, page: &str) -> ProbeResult<&Locator> {
        self.get(name).ok_or_else(|| ProbeError::UnknownLocator {
            name: name.to_string(),
            page: page.to_string(),
        })
    }

    /// Whether a name is bound
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.locators.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.locators.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Whether the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}
