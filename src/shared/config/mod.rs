//! Configuration module
//!
//! Provides the client configuration and the configuration error type shared
//! with the server's configuration loader.

use std::time::Duration;
use thiserror::Error;

/// Default delay between reconnect attempts
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Default number of reconnect attempts before giving up
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Socket endpoint, e.g. `ws://127.0.0.1:3000/websocket`
    pub websocket_url: String,
    /// REST base URL, e.g. `http://127.0.0.1:3000`
    pub http_url: Option<String>,
    /// Fixed delay between reconnect attempts
    pub reconnect_delay: Duration,
    /// Reconnect attempts after an unexpected close before giving up
    pub max_reconnect_attempts: u32,
}

impl ClientConfig {
    /// Create a new ClientConfigBuilder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.websocket_url.starts_with("ws://") || self.websocket_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(self.websocket_url.clone()));
        }
        if let Some(http_url) = &self.http_url {
            if !(http_url.starts_with("http://") || http_url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(http_url.clone()));
            }
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    websocket_url: Option<String>,
    http_url: Option<String>,
    reconnect_delay: Option<Duration>,
    max_reconnect_attempts: Option<u32>,
}

impl ClientConfigBuilder {
    /// Set the socket URL
    pub fn websocket_url(mut self, url: impl Into<String>) -> Self {
        self.websocket_url = Some(url.into());
        self
    }

    /// Set the REST base URL
    pub fn http_url(mut self, url: impl Into<String>) -> Self {
        self.http_url = Some(url.into());
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let config = ClientConfig {
            websocket_url: self
                .websocket_url
                .ok_or(ConfigError::MissingValue("websocket_url"))?,
            http_url: self.http_url,
            reconnect_delay: self.reconnect_delay.unwrap_or(DEFAULT_RECONNECT_DELAY),
            max_reconnect_attempts: self
                .max_reconnect_attempts
                .unwrap_or(DEFAULT_MAX_RECONNECT_ATTEMPTS),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
