//! Connection settings for the management API

use crate::{
    auth::Credentials,
    error::{
        Error,
        Result,
    },
};
use std::time::Duration;
use url::Url;

pub const DEFAULT_HOST: &str = "localhost";
/// Port of the management plugin, not the AMQP listener
pub const DEFAULT_PORT: u16 = 15672;
pub const DEFAULT_VHOST: &str = "/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const HOST_ENV: &str = "RABBITMQ_HOST";
pub const PORT_ENV: &str = "RABBITMQ_PORT";
pub const USER_ENV: &str = "RABBITMQ_USER";
pub const PASS_ENV: &str = "RABBITMQ_PASS";
pub const VHOST_ENV: &str = "RABBITMQ_VHOST";

/// Where the management API lives and how to talk to it
#[derive(Debug, Clone, PartialEq)]
pub struct ManagementConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    /// Virtual host every resource path is scoped to
    pub vhost: String,
    /// Applied to each request individually
    pub request_timeout: Duration,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            credentials: Credentials::default(),
            vhost: DEFAULT_VHOST.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ManagementConfig {
    /// Create a configuration for the given host and port with default
    /// credentials and vhost
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_vhost(mut self, vhost: impl Into<String>) -> Self {
        self.vhost = vhost.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load settings from the `RABBITMQ_*` environment variables
    ///
    /// Unset variables fall back to the defaults (`localhost:15672`,
    /// `guest`/`guest`, vhost `/`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env()` but reads variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup(PORT_ENV) {
            Some(raw) => {
                raw.trim().parse::<u16>().map_err(|_| {
                    Error::ConfigError(format!("Invalid {PORT_ENV} '{raw}': expected a port number"))
                })?
            }
            None => defaults.port,
        };

        let credentials = Credentials::new(
            lookup(USER_ENV).unwrap_or_else(|| defaults.credentials.username().to_string()),
            lookup(PASS_ENV).unwrap_or_else(|| defaults.credentials.password().to_string()),
        )?;

        let config = Self {
            host: lookup(HOST_ENV).unwrap_or(defaults.host),
            port,
            credentials,
            vhost: lookup(VHOST_ENV).unwrap_or(defaults.vhost),
            request_timeout: defaults.request_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::ConfigError("Host cannot be empty".to_string()));
        }
        if self.host.contains('/') {
            return Err(Error::ConfigError(format!(
                "Host '{}' must be a bare hostname, not a URL",
                self.host
            )));
        }
        if self.port == 0 {
            return Err(Error::ConfigError("Port cannot be 0".to_string()));
        }
        if self.vhost.is_empty() {
            return Err(Error::ConfigError("Virtual host cannot be empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::ConfigError(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Root of the management API, e.g. `http://localhost:15672/api/`
    pub fn api_base(&self) -> Result<Url> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        Ok(Url::parse(&format!("http://{host}:{}/api/", self.port))?)
    }
}
