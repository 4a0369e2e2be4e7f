//! Server configuration read from the environment at startup.

use quotation_core::{default_log_level, ConfigError, StorageConfig};
use std::net::SocketAddr;

pub const ENV_HTTP_BIND: &str = "QUOTATION_HTTP_BIND";
pub const ENV_LOG_LEVEL: &str = "QUOTATION_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QUOTATION_LOG_DIR";

const DEFAULT_HTTP_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<String>,
    pub storage: StorageConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_text = read(ENV_HTTP_BIND).unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());
        let bind = bind_text.parse::<SocketAddr>().map_err(|err| {
            ConfigError::new(ENV_HTTP_BIND, format!("`{bind_text}` is not host:port: {err}"))
        })?;

        Ok(Self {
            bind,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR),
            storage: StorageConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, ENV_HTTP_BIND, ENV_LOG_DIR};
    use quotation_core::StorageConfig;

    #[test]
    fn defaults_bind_loopback_and_log_to_stderr() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            ENV_HTTP_BIND => Some("0.0.0.0:8080".to_string()),
            ENV_LOG_DIR => Some("/var/log/quotation".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/quotation"));
    }

    #[test]
    fn rejects_malformed_bind_address() {
        let err = ServerConfig::from_lookup(|key| {
            (key == ENV_HTTP_BIND).then(|| "localhost".to_string())
        })
        .unwrap_err();
        assert_eq!(err.variable, ENV_HTTP_BIND);
    }
}
