//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use shared_crypto::{CryptoError, SecretKey};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Envelope key source
    pub cipher: CipherConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.timeouts.request.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    /// Defaults overridden by `EO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("EO_GATEWAY_HOST") {
            config.http.host = host
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("EO_GATEWAY_HOST: {}", host)))?;
        }
        if let Some(port) = lookup("EO_GATEWAY_PORT") {
            config.http.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("EO_GATEWAY_PORT: {}", port)))?;
        }
        if let Some(path) = lookup("EO_GATEWAY_KEY_FILE") {
            config.cipher.key_file = Some(PathBuf::from(path));
        }
        if let Some(key) = lookup("EO_GATEWAY_KEY_HEX") {
            config.cipher.key_hex = Some(key);
        }
        if let Some(level) = lookup("EO_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 56001)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 56001,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 1MB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 1024 * 1024, // 1MB
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a whole request, body read through response
    #[serde(with = "humantime_serde")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
        }
    }
}

/// Envelope key source. `key_hex` wins when both are set.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// File holding a shared passphrase; the key is its SHA-256
    pub key_file: Option<PathBuf>,
    /// Raw 32-byte key as 64 hex characters
    #[serde(skip_serializing)]
    pub key_hex: Option<String>,
}

impl CipherConfig {
    /// Resolve the configured key, `None` if no source is configured.
    pub fn load_key(&self) -> Result<Option<SecretKey>, ConfigError> {
        if let Some(encoded) = &self.key_hex {
            return SecretKey::from_hex(encoded).map(Some).map_err(ConfigError::Key);
        }

        let Some(path) = &self.key_file else {
            return Ok(None);
        };
        let contents = std::fs::read(path).map_err(|source| ConfigError::KeyFile {
            path: path.clone(),
            source,
        })?;
        SecretKey::derive_from_passphrase(contents.trim_ascii())
            .map(Some)
            .map_err(ConfigError::Key)
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("key_file", &self.key_file)
            .field("key_hex", &self.key_hex.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `EO_LOG_LEVEL` / `RUST_LOG` are unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Port 0 would bind an ephemeral port callers cannot find
    #[error("port cannot be 0")]
    InvalidPort,
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Key file could not be read
    #[error("cannot read key file {path:?}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Key material rejected
    #[error("invalid key: {0}")]
    Key(#[source] CryptoError),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s" and "m", both are suffixes of it
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            // Try parsing as plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
