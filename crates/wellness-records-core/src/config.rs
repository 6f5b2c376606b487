//! Store configuration.
//!
//! The data directory is resolved with the following precedence:
//! 1. WELLNESS_RECORDS_DATA_DIR environment variable
//! 2. ~/.local/share/wellness-records
//! 3. ./data (fallback for development)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DATA_DIR_ENV: &str = "WELLNESS_RECORDS_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".local/share/wellness-records";
const DEV_DATA_DIR: &str = "./data";

/// File name of the store inside the data directory.
pub const DB_FILE_NAME: &str = "HealthManagement.db";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives and how long a call waits on a locked file.
///
/// Passed explicitly to [`crate::db::Database::open`]; nothing in the crate
/// reads a global connection string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the database file
    pub db_path: PathBuf,
    /// Applied to every per-call connection
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Store file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DB_FILE_NAME))
    }

    /// Store file inside the resolved data directory.
    pub fn from_env() -> Self {
        Self::in_dir(data_dir())
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

/// Get the data directory for the store.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_DATA_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_is_never_empty() {
        // Either the env override, the home default or ./data
        assert!(!data_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_in_dir_uses_default_file_name() {
        let config = StoreConfig::in_dir("/tmp/practice");
        assert_eq!(config.db_path, PathBuf::from("/tmp/practice/HealthManagement.db"));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_serializes() {
        let config = StoreConfig::new("store.db").with_busy_timeout(Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        let back: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
