//! Runtime configuration.
//!
//! Resolved once at process startup (from CLI arguments and environment
//! fallbacks in the binary) and then passed into the roster. Nothing in the
//! core reads environment variables itself.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::storage::{JsonFileStorage, RosterStorage, SqliteStorage, StorageResult};

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/roster.json";

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "clinic_roster=info";

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown storage backend: {0} (expected json or sqlite)")]
    UnknownBackend(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the roster is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageBackend::Json => "json",
            StorageBackend::Sqlite => "sqlite",
        })
    }
}

/// Roster configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    data_path: PathBuf,
    backend: StorageBackend,
    log_filter: String,
    seed_sample_data: bool,
}

impl RosterConfig {
    pub fn new(
        data_path: PathBuf,
        backend: StorageBackend,
        log_filter: String,
        seed_sample_data: bool,
    ) -> ConfigResult<Self> {
        if data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data path cannot be empty".into()));
        }
        if log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log filter cannot be empty".into()));
        }

        Ok(Self {
            data_path,
            backend,
            log_filter,
            seed_sample_data,
        })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Whether to start from the sample roster when nothing is stored.
    pub fn seed_sample_data(&self) -> bool {
        self.seed_sample_data
    }

    /// Open the configured storage backend.
    pub fn open_storage(&self) -> StorageResult<Box<dyn RosterStorage>> {
        Ok(match self.backend {
            StorageBackend::Json => Box::new(JsonFileStorage::new(&self.data_path)),
            StorageBackend::Sqlite => {
                if let Some(parent) = self.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Box::new(SqliteStorage::open(&self.data_path)?)
            }
        })
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            backend: StorageBackend::Json,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed_sample_data: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("JSON".parse::<StorageBackend>().unwrap(), StorageBackend::Json);
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert!(matches!(
            "csv".parse::<StorageBackend>(),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_new_validates() {
        assert!(RosterConfig::new(PathBuf::new(), StorageBackend::Json, "info".into(), true).is_err());
        assert!(RosterConfig::new("roster.json".into(), StorageBackend::Json, " ".into(), true).is_err());

        let config =
            RosterConfig::new("roster.db".into(), StorageBackend::Sqlite, "debug".into(), false)
                .unwrap();
        assert_eq!(config.backend(), StorageBackend::Sqlite);
        assert!(!config.seed_sample_data());
    }

    #[test]
    fn test_open_storage_creates_parent_for_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("roster.db");
        let config =
            RosterConfig::new(path.clone(), StorageBackend::Sqlite, "info".into(), false).unwrap();
        let storage = config.open_storage().unwrap();
        assert!(path.exists());
        assert!(storage.describe().starts_with("sqlite:"));
    }
}
