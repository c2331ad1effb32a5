//! # Runtime Configuration
//!
//! Settings for the database and the sale rules, loaded once at startup.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Sources                                │
//! │                                                                         │
//! │  1. Defaults        BloomConfig::default()                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. bloom.toml      <platform config dir>/bloom.toml                   │
//! │         │           (or an explicit path)                               │
//! │         ▼                                                               │
//! │  3. Environment     BLOOM_DATABASE_PATH                                │
//! │                     BLOOM_MAX_CONNECTIONS                              │
//! │                     BLOOM_BUSY_TIMEOUT_MS                              │
//! │                     BLOOM_LOW_STOCK_THRESHOLD                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;
use bloom_core::validation::validate_low_stock_threshold;
use bloom_core::DEFAULT_LOW_STOCK_THRESHOLD;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file location.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a sale waits for another sale's write lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "bloom", "florist")
        .map(|dirs| dirs.data_dir().join("bloom.db"))
        .unwrap_or_else(|| PathBuf::from("bloom.db"))
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// `[inventory]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// A sale leaving fewer stems than this raises a LOW_STOCK alert.
    /// Zero disables alerts.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

// =============================================================================
// BloomConfig
// =============================================================================

/// Complete runtime configuration.
///
/// ## Example bloom.toml
/// ```toml
/// [database]
/// path = "/var/lib/bloom/bloom.db"
/// max_connections = 5
/// busy_timeout_ms = 5000
///
/// [inventory]
/// low_stock_threshold = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub inventory: InventorySettings,
}

impl BloomConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| DbError::Config(format!("{}: {e}", path.display())))?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> DbResult<Self> {
        toml::from_str(contents).map_err(|e| DbError::Config(e.to_string()))
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DbError::Config(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| DbError::Config(e.to_string()))?;
        std::fs::write(&path, contents).map_err(|e| DbError::Config(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        validate_low_stock_threshold(self.inventory.low_stock_threshold)
            .map_err(|e| DbError::Config(e.to_string()))?;

        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(DbError::Config("database path must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `BLOOM_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("BLOOM_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(value) = lookup("BLOOM_MAX_CONNECTIONS") {
            match value.parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %value, "Ignoring invalid BLOOM_MAX_CONNECTIONS"),
            }
        }

        if let Some(value) = lookup("BLOOM_BUSY_TIMEOUT_MS") {
            match value.parse::<u64>() {
                Ok(ms) => self.database.busy_timeout_ms = ms,
                Err(_) => warn!(value = %value, "Ignoring invalid BLOOM_BUSY_TIMEOUT_MS"),
            }
        }

        if let Some(value) = lookup("BLOOM_LOW_STOCK_THRESHOLD") {
            match value.parse::<i64>() {
                Ok(threshold) => {
                    debug!(threshold, "Overriding low stock threshold from environment");
                    self.inventory.low_stock_threshold = threshold;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid BLOOM_LOW_STOCK_THRESHOLD"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bloom", "florist")
            .map(|dirs| dirs.config_dir().join("bloom.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pool settings derived from the `[database]` section.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .busy_timeout(Duration::from_millis(self.database.busy_timeout_ms))
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.inventory.low_stock_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BloomConfig::default();
        assert_eq!(config.low_stock_threshold(), DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BloomConfig::from_toml(
            r#"
            [inventory]
            low_stock_threshold = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.low_stock_threshold(), 3);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = BloomConfig::from_toml("[inventory\nlow_stock_threshold = ").unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = BloomConfig::default();
        config.inventory.low_stock_threshold = -1;
        assert!(config.validate().is_err());

        config.inventory.low_stock_threshold = 0;
        assert!(config.validate().is_ok());

        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BLOOM_DATABASE_PATH", "/tmp/shop.db"),
            ("BLOOM_MAX_CONNECTIONS", "8"),
            ("BLOOM_BUSY_TIMEOUT_MS", "not-a-number"),
            ("BLOOM_LOW_STOCK_THRESHOLD", "25"),
        ]
        .into_iter()
        .collect();

        let mut config = BloomConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.low_stock_threshold(), 25);
    }

    #[test]
    fn test_db_config_mapping() {
        let mut config = BloomConfig::default();
        config.database.path = PathBuf::from("/tmp/x.db");
        config.database.busy_timeout_ms = 750;

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(db.busy_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bloom.toml");

        let mut config = BloomConfig::default();
        config.inventory.low_stock_threshold = 7;
        config.database.path = dir.path().join("bloom.db");
        config.save(Some(path.clone())).unwrap();

        let loaded = BloomConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }
}
