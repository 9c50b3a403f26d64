//! Lazily started, exclusively owned browser session.

use crate::driver::Driver;
use crate::result::{ProbeError, ProbeResult};
use std::cell::OnceCell;
use std::fmt;
use tracing::{debug, warn};

type Launcher<D> = Box<dyn Fn() -> ProbeResult<D>>;

/// One driver handle, started on first use and closed exactly once.
///
/// The launcher runs at most once: after a failed start every later use
/// reports the same failure as [`ProbeError::Launch`].
///
/// The session is closed by [`close`](Self::close) or, failing that, when
/// the value is dropped. Closing a session that was never started or is
/// already closed does nothing.
pub struct Session<D: Driver> {
    launcher: Launcher<D>,
    driver: OnceCell<D>,
    launch_failure: OnceCell<String>,
    closed: bool,
}

impl<D: Driver> fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("started", &self.is_started())
            .field("closed", &self.closed)
            .field("launch_failed", &self.launch_failure.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<D: Driver> Session<D> {
    /// Create a session that starts its driver with `launcher` on first use
    pub fn lazy<F>(launcher: F) -> Self
    where
        F: Fn() -> ProbeResult<D> + 'static,
    {
        Self {
            launcher: Box::new(launcher),
            driver: OnceCell::new(),
            launch_failure: OnceCell::new(),
            closed: false,
        }
    }

    /// Wrap an already started driver
    pub fn started(driver: D) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(driver);
        Self {
            launcher: Box::new(|| Err(ProbeError::SessionClosed)),
            driver: cell,
            launch_failure: OnceCell::new(),
            closed: false,
        }
    }

    /// Whether the driver has been started
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.driver.get().is_some()
    }

    /// Whether the session has been closed
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Driver, starting it if needed
    pub fn driver(&self) -> ProbeResult<&D> {
        if self.closed {
            return Err(ProbeError::SessionClosed);
        }
        if let Some(driver) = self.driver.get() {
            return Ok(driver);
        }
        if let Some(message) = self.launch_failure.get() {
            return Err(ProbeError::Launch {
                message: message.clone(),
            });
        }
        debug!("starting browser session");
        match (self.launcher)() {
            Ok(driver) => Ok(self.driver.get_or_init(|| driver)),
            Err(e) => {
                let _ = self.launch_failure.set(e.to_string());
                Err(e)
            }
        }
    }

    /// Mutable driver, starting it if needed
    pub fn driver_mut(&mut self) -> ProbeResult<&mut D> {
        let _ = self.driver()?;
        self.driver.get_mut().ok_or(ProbeError::SessionClosed)
    }

    /// Close the driver if it was started. Idempotent.
    pub fn close(&mut self) -> ProbeResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.driver.take() {
            Some(mut driver) => {
                debug!("closing browser session");
                driver.close()
            }
            None => Ok(()),
        }
    }
}

impl<D: Driver> Drop for Session<D> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close browser session");
        }
    }
}
