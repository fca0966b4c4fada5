//! Driver factories and the explicit driver registry.
//!
//! Registration is not ambient global state: callers construct a
//! [`DriverRegistry`], register driver factories on it, and resolve
//! connection URLs through it.

use std::sync::{Arc, Mutex};

use crate::config::ConnectOptions;
use crate::connection::Connection;
use crate::error::DriverError;
use crate::transport::Transport;

/// Produces an established transport session for the given options.
/// Connection establishment and retry live behind this boundary.
pub type TransportFactory =
    Arc<dyn Fn(&ConnectOptions) -> Result<Arc<dyn Transport>, DriverError> + Send + Sync>;

/// A driver factory: decides which URLs it accepts and opens connections.
pub trait Driver: Send + Sync {
    fn accepts_url(&self, url: &str) -> bool;

    fn connect(&self, url: &str) -> Result<Connection, DriverError>;
}

/// Driver for `crate://` URLs, parameterized over how transports are built.
pub struct CrateDriver {
    transport_factory: TransportFactory,
}

impl CrateDriver {
    pub fn new(transport_factory: TransportFactory) -> Self {
        Self { transport_factory }
    }
}

impl Driver for CrateDriver {
    fn accepts_url(&self, url: &str) -> bool {
        ConnectOptions::accepts_url(url)
    }

    fn connect(&self, url: &str) -> Result<Connection, DriverError> {
        let opts = ConnectOptions::from_url(url)?;
        let transport = (self.transport_factory)(&opts)?;
        Ok(opts.connect(transport))
    }
}

/// Maps connection URLs to registered driver factories.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Mutex<Vec<Arc<dyn Driver>>>,
}

impl DriverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, driver: Arc<dyn Driver>) {
        self.drivers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(driver);
    }

    /// Open a connection through the first registered driver accepting `url`.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Config` when no registered driver accepts the
    /// URL; otherwise propagates the driver's own connect error.
    pub fn connect(&self, url: &str) -> Result<Connection, DriverError> {
        let driver = {
            let drivers = self
                .drivers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            drivers.iter().find(|d| d.accepts_url(url)).cloned()
        };
        match driver {
            Some(driver) => driver.connect(url),
            None => Err(DriverError::Config(format!(
                "no registered driver accepts URL: {url}"
            ))),
        }
    }
}
