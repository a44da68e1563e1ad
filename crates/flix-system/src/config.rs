//! # Desk Configuration
//!
//! Configuration management for the rental desk.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FLIX_CATALOG_PATH=./movies.txt                                     │
//! │     FLIX_DIRECTORY_CAPACITY=50                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/flix-rental/desk.toml (Linux)                            │
//! │     ~/Library/Application Support/com.flix.rental/desk.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     catalog.txt, 20 accounts, admin/admin                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # desk.toml
//! [catalog]
//! path = "movies.txt"
//!
//! [directory]
//! capacity = 20
//!
//! [admin]
//! id = "admin"
//! credential = "admin"
//!
//! [logging]
//! filter = "info,flix=debug"
//! ```

use std::path::{Path, PathBuf};

use flix_core::validation::{validate_account_id, validate_credential};
use flix_core::DEFAULT_DIRECTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DeskError, DeskResult};

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_CATALOG_PATH: &str = "FLIX_CATALOG_PATH";
pub const ENV_DIRECTORY_CAPACITY: &str = "FLIX_DIRECTORY_CAPACITY";
pub const ENV_ADMIN_ID: &str = "FLIX_ADMIN_ID";
pub const ENV_ADMIN_CREDENTIAL: &str = "FLIX_ADMIN_CREDENTIAL";
pub const ENV_LOG: &str = "FLIX_LOG";

// =============================================================================
// Sections
// =============================================================================

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Catalog file, one `<count> <title>` entry per line.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.txt")
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            path: default_catalog_path(),
        }
    }
}

/// Account directory settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// Maximum number of registered accounts.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_DIRECTORY_CAPACITY
}

impl Default for DirectorySettings {
    fn default() -> Self {
        DirectorySettings {
            capacity: default_capacity(),
        }
    }
}

/// Administrator credentials. Plaintext, compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_admin")]
    pub id: String,

    #[serde(default = "default_admin")]
    pub credential: String,
}

fn default_admin() -> String {
    "admin".to_string()
}

impl Default for AdminSettings {
    fn default() -> Self {
        AdminSettings {
            id: default_admin(),
            credential: default_admin(),
        }
    }
}

impl AdminSettings {
    /// True when `id`/`credential` are exactly the administrator's.
    pub fn matches(&self, id: &str, credential: &str) -> bool {
        self.id == id && self.credential == credential
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info,flix=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Main Desk Configuration
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub directory: DirectorySettings,

    #[serde(default)]
    pub admin: AdminSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl DeskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`desk.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DeskResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                config = Self::from_file(&path)?;
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
            warn!("Failed to load desk config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without env overrides or validation.
    pub fn from_file(path: &Path) -> DeskResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> DeskResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DeskError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Desk config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DeskResult<()> {
        if self.directory.capacity == 0 {
            return Err(DeskError::InvalidConfig(
                "directory capacity must be greater than 0".into(),
            ));
        }

        if self.catalog.path.as_os_str().is_empty() {
            return Err(DeskError::InvalidConfig("catalog path is empty".into()));
        }

        validate_account_id(&self.admin.id)
            .map_err(|e| DeskError::InvalidConfig(format!("admin {e}")))?;
        validate_credential(&self.admin.credential)
            .map_err(|e| DeskError::InvalidConfig(format!("admin {e}")))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_CATALOG_PATH) {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = PathBuf::from(path);
        }

        if let Some(capacity) = lookup(ENV_DIRECTORY_CAPACITY) {
            match capacity.parse::<usize>() {
                Ok(c) => {
                    debug!(capacity = c, "Overriding directory capacity from environment");
                    self.directory.capacity = c;
                }
                Err(_) => warn!(capacity = %capacity, "Ignoring non-numeric directory capacity"),
            }
        }

        if let Some(id) = lookup(ENV_ADMIN_ID) {
            self.admin.id = id;
        }

        if let Some(credential) = lookup(ENV_ADMIN_CREDENTIAL) {
            self.admin.credential = credential;
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "flix", "rental")
            .map(|dirs| dirs.config_dir().join("desk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn catalog_path(&self) -> &Path {
        &self.catalog.path
    }

    pub fn capacity(&self) -> usize {
        self.directory.capacity
    }

    pub fn log_filter(&self) -> &str {
        &self.logging.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();
        assert_eq!(config.catalog_path(), Path::new("catalog.txt"));
        assert_eq!(config.capacity(), 20);
        assert!(config.admin.matches("admin", "admin"));
        assert_eq!(config.log_filter(), "info,flix=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_admin_match_is_exact() {
        let admin = AdminSettings::default();
        assert!(!admin.matches("Admin", "admin"));
        assert!(!admin.matches("admin ", "admin"));
        assert!(!admin.matches("admin", "pw"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = DeskConfig::default();

        config.directory.capacity = 0;
        assert!(matches!(config.validate(), Err(DeskError::InvalidConfig(_))));

        config.directory.capacity = 5;
        config.admin.id = "ad min".to_string();
        assert!(config.validate().is_err());

        config.admin.id = "root".to_string();
        config.admin.credential = String::new();
        assert!(config.validate().is_err());

        config.admin.credential = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_CATALOG_PATH, "/srv/movies.txt"),
            (ENV_DIRECTORY_CAPACITY, "3"),
            (ENV_ADMIN_ID, "root"),
            (ENV_LOG, "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = DeskConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.catalog_path(), Path::new("/srv/movies.txt"));
        assert_eq!(config.capacity(), 3);
        assert_eq!(config.admin.id, "root");
        assert_eq!(config.admin.credential, "admin");
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_bad_capacity_override_is_ignored() {
        let mut config = DeskConfig::default();
        config.apply_overrides(|key| (key == ENV_DIRECTORY_CAPACITY).then(|| "lots".to_string()));
        assert_eq!(config.capacity(), 20);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DeskConfig = toml::from_str("[directory]\ncapacity = 7\n").unwrap();
        assert_eq!(config.capacity(), 7);
        assert_eq!(config.catalog_path(), Path::new("catalog.txt"));
        assert_eq!(config.admin, AdminSettings::default());
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("desk.toml");

        let mut config = DeskConfig::default();
        config.directory.capacity = 12;
        config.catalog.path = PathBuf::from("films.txt");
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[directory]"));
        assert_eq!(DeskConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "[directory\ncapacity = ").unwrap();
        assert!(matches!(
            DeskConfig::from_file(&path),
            Err(DeskError::ConfigLoadFailed(_))
        ));
    }
}
