/**
 * Server Configuration
 *
 * Configuration is assembled in layers:
 *
 * 1. Built-in defaults
 * 2. An optional TOML file (`GAMECHAT_CONFIG`, else `./gamechat.toml` if present)
 * 3. Environment variable overrides (`SERVER_HOST`, `SERVER_PORT`, `JWT_SECRET`,
 *    `TOKEN_TTL_SECS`, `WEBSOCKET_PATH`, `MESSAGE_HISTORY`, `CORS_ORIGIN`)
 *
 * The result is validated before the server starts.
 */

use crate::shared::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Secret used when none is configured. Fine for local development only.
pub const DEFAULT_JWT_SECRET: &str = "gamechat-dev-secret-change-in-production";

const DEFAULT_CONFIG_FILE: &str = "gamechat.toml";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Path of the socket upgrade endpoint
    pub websocket_path: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl_secs: u64,
    /// Max-Age of the `authToken` cookie
    pub cookie_max_age_secs: u64,
    /// Messages kept per room for `getMessages` replay
    pub message_history: usize,
    /// Frames buffered per connection before it counts as a slow consumer
    pub outbound_queue: usize,
    /// Longest accepted chat message, in characters
    pub max_message_len: usize,
    /// Interval between server pings
    pub heartbeat_interval_secs: u64,
    /// Silence after which a connection is dropped
    pub idle_timeout_secs: u64,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
    /// Allowed browser origin; `None` disables CORS headers
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            websocket_path: "/websocket".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: 24 * 60 * 60,
            cookie_max_age_secs: 7 * 24 * 60 * 60,
            message_history: 100,
            outbound_queue: 256,
            max_message_len: 2000,
            heartbeat_interval_secs: 30,
            idle_timeout_secs: 90,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed, an
    /// environment override is not a valid value, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("GAMECHAT_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        if config.uses_default_secret() {
            tracing::warn!("[Server] JWT_SECRET not set, using the development secret");
        }
        tracing::info!(
            "[Server] Configuration loaded: {}:{}, socket path {}",
            config.host,
            config.port,
            config.websocket_path
        );
        Ok(config)
    }

    /// Read a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse TOML; keys that are absent keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_value("SERVER_PORT", &port)?;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            self.token_ttl_secs = parse_value("TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(path) = lookup("WEBSOCKET_PATH") {
            self.websocket_path = path;
        }
        if let Some(history) = lookup("MESSAGE_HISTORY") {
            self.message_history = parse_value("MESSAGE_HISTORY", &history)?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors_origin = Some(origin).filter(|origin| !origin.is_empty());
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.websocket_path.starts_with('/') {
            return Err(invalid("websocket_path", "must start with '/'"));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(invalid("jwt_secret", "must not be empty"));
        }
        if self.token_ttl_secs == 0 {
            return Err(invalid("token_ttl_secs", "must be positive"));
        }
        if self.outbound_queue == 0 {
            return Err(invalid("outbound_queue", "must be positive"));
        }
        if self.max_message_len == 0 {
            return Err(invalid("max_message_len", "must be positive"));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(invalid("heartbeat_interval_secs", "must be positive"));
        }
        if self.idle_timeout_secs <= self.heartbeat_interval_secs {
            return Err(invalid(
                "idle_timeout_secs",
                "must be longer than the heartbeat interval",
            ));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(invalid("bcrypt_cost", "must be between 4 and 31"));
        }
        self.socket_addr().map(|_| ())
    }

    /// Address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|err: std::net::AddrParseError| invalid("host", err.to_string()))
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| invalid(key, err.to_string()))
}

fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        message: message.into(),
    }
}
