//! Storage configuration.
//!
//! # Responsibility
//! - Resolve which backend stores quotations and where.
//! - Read environment variables once, at startup, into explicit values.
//!
//! # Invariants
//! - Unknown backend names are rejected, never silently defaulted.
//! - Lookup is injectable so parsing is testable without touching the
//!   process environment.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_STORAGE_BACKEND: &str = "QUOTATION_STORAGE_BACKEND";
pub const ENV_STORAGE_DIR: &str = "QUOTATION_STORAGE_DIR";
pub const ENV_SQLITE_PATH: &str = "QUOTATION_SQLITE_PATH";

const DEFAULT_STORAGE_DIR: &str = "quotations";
const DEFAULT_SQLITE_FILE_NAME: &str = "quotations.sqlite3";

/// Configuration error naming the offending variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl ConfigError {
    pub fn new(variable: &'static str, message: impl Into<String>) -> Self {
        Self {
            variable,
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.variable, self.message)
    }
}

impl Error for ConfigError {}

/// Where quotation documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// One `<id>.json` file per quotation under `dir`.
    JsonFiles { dir: PathBuf },
    /// Single SQLite database file.
    Sqlite { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::JsonFiles {
            dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

impl StorageConfig {
    /// Reads storage settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads storage settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let dir = read(ENV_STORAGE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        let backend = read(ENV_STORAGE_BACKEND)
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| "json".to_string());

        match backend.as_str() {
            "json" | "files" => Ok(Self::JsonFiles { dir }),
            "sqlite" => {
                let path = read(ENV_SQLITE_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| dir.join(DEFAULT_SQLITE_FILE_NAME));
                Ok(Self::Sqlite { path })
            }
            other => Err(ConfigError::new(
                ENV_STORAGE_BACKEND,
                format!("unsupported backend `{other}`; expected json|sqlite"),
            )),
        }
    }

    /// Short backend name for log lines.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::JsonFiles { .. } => "json",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StorageConfig, ENV_STORAGE_BACKEND, ENV_STORAGE_DIR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_json_files_in_quotations_dir() {
        let config = StorageConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorageConfig::default());
    }

    #[test]
    fn sqlite_path_defaults_under_storage_dir() {
        let config = StorageConfig::from_lookup(lookup(&[
            (ENV_STORAGE_BACKEND, " SQLite "),
            (ENV_STORAGE_DIR, "/var/lib/quotes"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            StorageConfig::Sqlite {
                path: PathBuf::from("/var/lib/quotes/quotations.sqlite3")
            }
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = StorageConfig::from_lookup(lookup(&[(ENV_STORAGE_BACKEND, "redis")]))
            .unwrap_err();
        assert_eq!(err.variable, ENV_STORAGE_BACKEND);
        assert!(err.to_string().contains("redis"));
    }
}
