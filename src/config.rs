//! Connection options and connection-URL parsing.
//!
//! A connection URL has the shape `crate://host:port/schema`; port and schema
//! fall back to the engine defaults when omitted.

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::connection::Connection;
use crate::error::DriverError;
use crate::transport::Transport;

/// URL scheme accepted by the driver.
pub const URL_SCHEME: &str = "crate://";

/// Default engine port.
pub const DEFAULT_PORT: u16 = 4200;

/// Default schema when the URL names none.
pub const DEFAULT_SCHEMA: &str = "doc";

lazy_static! {
    static ref URL_RE: Regex =
        Regex::new(r"^crate://(?P<host>[^:/\s]+)(?::(?P<port>\d{1,5}))?(?:/(?P<schema>\w+))?/?$")
            .expect("connection URL regex");
}

/// Where and what to connect to: host, port, and target schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub schema: String,
}

impl ConnectOptions {
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConnectOptionsBuilder {
        ConnectOptionsBuilder {
            opts: ConnectOptions::new(host),
        }
    }

    /// Parse a `crate://host:port/schema` connection URL.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Config` when the URL does not match the scheme
    /// or names an out-of-range port.
    pub fn from_url(url: &str) -> Result<Self, DriverError> {
        let caps = URL_RE
            .captures(url)
            .ok_or_else(|| DriverError::Config(format!("invalid connection URL: {url}")))?;
        let port = match caps.name("port") {
            Some(m) => m
                .as_str()
                .parse::<u16>()
                .map_err(|_| DriverError::Config(format!("port out of range in URL: {url}")))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: caps["host"].to_string(),
            port,
            schema: caps
                .name("schema")
                .map_or_else(|| DEFAULT_SCHEMA.to_string(), |m| m.as_str().to_string()),
        })
    }

    /// Whether `url` carries the scheme this driver understands.
    #[must_use]
    pub fn accepts_url(url: &str) -> bool {
        url.starts_with(URL_SCHEME)
    }

    /// Open a connection context over an established transport session.
    pub fn connect(&self, transport: Arc<dyn Transport>) -> Connection {
        Connection::new(transport, self.schema.clone())
    }
}

/// Fluent builder for connection options.
#[derive(Debug, Clone)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.opts.schema = schema.into();
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }
}
