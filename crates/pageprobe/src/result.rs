//! Result and error types for Pageprobe.

use thiserror::Error;

/// Result type for Pageprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A required element did not become present within the wait
    #[error("Timed out after {ms}ms waiting for {waiting_for} ({page}) to be found")]
    Timeout {
        /// What was being waited for
        waiting_for: String,
        /// Page the wait ran against
        page: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Lookup by text or locator matched nothing
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the lookup
        what: String,
    },

    /// Invalid suite configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Locator name is not registered on the page
    #[error("Unknown locator '{name}' on {page}")]
    UnknownLocator {
        /// Requested locator name
        name: String,
        /// Page the lookup ran against
        page: String,
    },

    /// Session was already closed
    #[error("Browser session is closed")]
    SessionClosed,

    /// Browser session could not be started
    #[error("Failed to launch browser session: {message}")]
    Launch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Command rejected by the driver
    #[error("Driver command failed: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a not-found error
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Whether this error is a readiness timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error means the session itself is unusable, as opposed
    /// to a single command failing
    #[must_use]
    pub const fn is_session_error(&self) -> bool {
        matches!(
            self,
            Self::SessionClosed | Self::Launch { .. } | Self::Configuration { .. }
        )
    }

    /// Whether this error is a not-found lookup
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_element_and_page() {
        let err = ProbeError::Timeout {
            waiting_for: "new_todo_entry".to_string(),
            page: "EmberTodoPage".to_string(),
            ms: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("new_todo_entry"));
        assert!(msg.contains("EmberTodoPage"));
        assert!(msg.contains("250ms"));
        assert!(err.is_timeout());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_constructor() {
        let err = ProbeError::not_found("todo with text 'x'");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: todo with text 'x'");
    }

    #[test]
    fn test_configuration_constructor() {
        let err = ProbeError::configuration("unknown browser 'opera'");
        assert!(matches!(err, ProbeError::Configuration { .. }));
    }
}
