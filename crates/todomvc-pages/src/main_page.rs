//! TodoMVC landing page.

use pageprobe::{
    BasePage, Driver, Locator, LocatorMap, PageObject, ProbeResult, Session, SuiteConfig,
};

/// Link to the EmberJS example
pub const EMBERJS_LINK: Locator = Locator::css(r#"a[data-source="http://emberjs.com"]"#);

/// Page object for the TodoMVC landing page.
///
/// The page declares no required elements, so `open()` returns as soon as
/// navigation completes. Callers that need the link rendered should check
/// `is_present("emberjs_link")` themselves.
#[derive(Debug)]
pub struct TodoMvcMainPage<D: Driver> {
    base: BasePage<D>,
}

impl<D: Driver> TodoMvcMainPage<D> {
    /// Page name used in logs and errors
    pub const NAME: &'static str = "TodoMvcMainPage";

    /// Create the page over a session
    pub fn new(session: Session<D>, config: &SuiteConfig) -> Self {
        let locators = LocatorMap::new().with("emberjs_link", EMBERJS_LINK);
        Self {
            base: BasePage::from_config(Self::NAME, session, config)
                .with_path("/")
                .with_locators(locators),
        }
    }

    /// Follow the EmberJS example link
    pub fn open_emberjs(&self) -> ProbeResult<()> {
        self.base.click("emberjs_link")
    }

    /// Give up the page and keep its session
    pub fn into_session(self) -> Session<D> {
        self.base.into_session()
    }
}

impl<D: Driver> PageObject for TodoMvcMainPage<D> {
    type Driver = D;

    fn base(&self) -> &BasePage<D> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BasePage<D> {
        &mut self.base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pageprobe::driver::{MockDriver, MockElement};

    #[test]
    fn test_open_navigates_to_root() {
        let driver = MockDriver::new();
        let history = driver.history();
        let mut page = TodoMvcMainPage::new(Session::started(driver), &SuiteConfig::default());
        page.open().unwrap();
        assert_eq!(history.borrow()[0], "navigate:http://todomvc.com/");
    }

    #[test]
    fn test_readiness_does_not_wait_for_link() {
        let session = Session::started(MockDriver::new());
        let page = TodoMvcMainPage::new(session, &SuiteConfig::default());
        assert!(page.base().required_elements().is_empty());
        assert!(page.is_page_loaded());
        assert!(!page.is_present("emberjs_link"));
    }

    #[test]
    fn test_open_emberjs_clicks_link() {
        let driver = MockDriver::new().with_element(MockElement::new("link", EMBERJS_LINK));
        let history = driver.history();
        let page = TodoMvcMainPage::new(Session::started(driver), &SuiteConfig::default());
        page.open_emberjs().unwrap();
        assert!(history.borrow().iter().any(|c| c == "click:link"));
    }
}
