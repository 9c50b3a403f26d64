//! Suite configuration read from the environment.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Browser engine selector
pub const ENV_BROWSER: &str = "WEBDRIVER_BROWSER";
/// WebDriver server URL override
pub const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";
/// Headless toggle
pub const ENV_HEADLESS: &str = "WEBDRIVER_HEADLESS";
/// Application base URL override
pub const ENV_BASE_URL: &str = "TODOMVC_BASE_URL";
/// Default wait timeout in whole seconds
pub const ENV_TIMEOUT_SECS: &str = "PAGEPROBE_TIMEOUT_SECS";

/// Default readiness timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default readiness polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default application under test
pub const DEFAULT_BASE_URL: &str = "http://todomvc.com";

/// Supported browser engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Browser {
    /// Google Chrome / Chromium via chromedriver
    #[default]
    Chrome,
    /// Mozilla Firefox via geckodriver
    Firefox,
}

impl Browser {
    /// Lower-case name as accepted by [`ENV_BROWSER`]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }

    /// Conventional local WebDriver server address
    #[must_use]
    pub const fn default_webdriver_url(&self) -> &'static str {
        match self {
            Self::Chrome => "http://localhost:9515",
            Self::Firefox => "http://localhost:4444",
        }
    }

    /// New-session capabilities for this engine
    #[must_use]
    pub fn capabilities(&self, headless: bool) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        match self {
            Self::Chrome => {
                let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage"];
                if headless {
                    args.push("--headless=new");
                    args.push("--disable-gpu");
                }
                let _ = caps.insert("browserName".to_string(), json!("chrome"));
                let _ = caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            Self::Firefox => {
                let args: Vec<&str> = if headless { vec!["-headless"] } else { vec![] };
                let _ = caps.insert("browserName".to_string(), json!("firefox"));
                let _ = caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Browser {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            other => Err(ProbeError::configuration(format!(
                "unsupported browser '{other}' in {ENV_BROWSER} (expected chrome or firefox)"
            ))),
        }
    }
}

/// Settings shared by every page object in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Browser engine
    pub browser: Browser,
    /// WebDriver server URL
    pub webdriver_url: String,
    /// Run without a visible window
    pub headless: bool,
    /// Application base URL
    pub base_url: String,
    /// Readiness timeout
    pub timeout: Duration,
    /// Readiness polling interval
    pub poll_interval: Duration,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let browser = Browser::default();
        Self {
            browser,
            webdriver_url: browser.default_webdriver_url().to_string(),
            headless: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment
    pub fn from_env() -> ProbeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let browser = match lookup(ENV_BROWSER) {
            Some(value) => value.parse()?,
            None => Browser::default(),
        };

        let mut config = Self::default().with_browser(browser);

        if let Some(url) = lookup(ENV_WEBDRIVER_URL) {
            config.webdriver_url = url;
        }
        if let Some(value) = lookup(ENV_HEADLESS) {
            config.headless = parse_flag(ENV_HEADLESS, &value)?;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = value.trim().parse().map_err(|_| {
                ProbeError::configuration(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{value}'"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set browser; also resets the WebDriver URL to that engine's default
    #[must_use]
    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self.webdriver_url = browser.default_webdriver_url().to_string();
        self
    }

    /// Set WebDriver server URL
    #[must_use]
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set application base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set readiness timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set readiness polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

fn parse_flag(key: &str, value: &str) -> ProbeResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProbeError::configuration(format!(
            "{key} must be a boolean flag, got '{value}'"
        ))),
    }
}
