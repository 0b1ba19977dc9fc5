//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults          (store "Shopkeep Store", data under ProjectDirs)  │
//! │  2. shopkeep.toml     ($SHOPKEEP_CONFIG or <config dir>/shopkeep.toml)  │
//! │  3. Environment       SHOPKEEP_DB_PATH, SHOPKEEP_BILLS_DIR,             │
//! │                       SHOPKEEP_STORE_NAME, SHOPKEEP_VIEWER,             │
//! │                       SHOPKEEP_CURRENCY                                 │
//! │                                                                         │
//! │  Later sources override earlier ones; validate() runs last.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Mamta Daily Needs"
//! address = "123 Main Street, City"
//! tax_id = "27ABCDE1234F1Z5"
//! currency_symbol = "₹"
//!
//! [storage]
//! database_path = "/var/lib/shopkeep/shop.db"
//! bills_dir = "/var/lib/shopkeep/bills"
//!
//! [receipt]
//! viewer = "xdg-open"
//! ```

use serde::{Deserialize, Serialize};
use shopkeep_core::StoreInfo;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SHOPKEEP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Printed on every receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default)]
    pub address: String,

    /// GSTIN or other tax registration number.
    #[serde(default)]
    pub tax_id: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Shopkeep Store".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: default_store_name(),
            address: String::new(),
            tax_id: String::new(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// One `<bill_no>.txt` per sale.
    #[serde(default = "default_bills_dir")]
    pub bills_dir: PathBuf,
}

fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "shopkeep", "shopkeep")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_database_path() -> PathBuf {
    data_dir().join("shopkeep.db")
}

fn default_bills_dir() -> PathBuf {
    data_dir().join("bills")
}

impl Default for StorageSection {
    fn default() -> Self {
        StorageSection {
            database_path: default_database_path(),
            bills_dir: default_bills_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSection {
    /// Command run with the receipt path appended, e.g. `"xdg-open"`.
    #[serde(default)]
    pub viewer: Option<String>,
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub receipt: ReceiptSection,
}

impl AppConfig {
    /// Loads configuration from defaults, file and environment.
    ///
    /// `config_path` wins over `$SHOPKEEP_CONFIG`, which wins over the
    /// platform default. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`AppConfig::load`] with environment variables read through `lookup`.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Applies `SHOPKEEP_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("SHOPKEEP_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("SHOPKEEP_BILLS_DIR") {
            debug!(dir = %dir, "Overriding bills directory from environment");
            self.storage.bills_dir = PathBuf::from(dir);
        }

        if let Some(name) = lookup("SHOPKEEP_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(viewer) = lookup("SHOPKEEP_VIEWER") {
            // Empty value switches the viewer off.
            self.receipt.viewer = Some(viewer).filter(|v| !v.trim().is_empty());
        }

        if let Some(symbol) = lookup("SHOPKEEP_CURRENCY") {
            self.store.currency_symbol = symbol;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.storage.bills_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.bills_dir must not be empty".into(),
            ));
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.database_path must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shopkeep", "shopkeep")
            .map(|dirs| dirs.config_dir().join("shopkeep.toml"))
    }

    pub fn store_info(&self) -> StoreInfo {
        StoreInfo {
            name: self.store.name.clone(),
            address: self.store.address.clone(),
            tax_id: self.store.tax_id.clone(),
            currency_symbol: self.store.currency_symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.currency_symbol, "₹");
        assert!(config.receipt.viewer.is_none());
        assert!(config.storage.bills_dir.ends_with("bills"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopkeep.toml");
        std::fs::write(
            &path,
            "[store]\nname = \"Mamta Daily Needs\"\ntax_id = \"123456789\"\n\n[receipt]\nviewer = \"less\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.store.name, "Mamta Daily Needs");
        assert_eq!(config.store.tax_id, "123456789");
        assert_eq!(config.store.currency_symbol, "₹");
        assert_eq!(config.receipt.viewer.as_deref(), Some("less"));
        assert_eq!(config.storage, StorageSection::default());
    }

    #[test]
    fn test_load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[store]\nname = \"Corner\"\n").unwrap();

        let config = AppConfig::load_with(Some(path), |_| None).unwrap();
        assert_eq!(config.store.name, "Corner");
        assert_eq!(config.store.currency_symbol, "₹");
    }

    #[test]
    fn test_load_finds_file_named_by_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("from-env.toml");
        std::fs::write(&path, "[store]\nname = \"Corner\"\n").unwrap();

        let env: HashMap<&str, String> = [
            (CONFIG_PATH_ENV, path.display().to_string()),
            ("SHOPKEEP_CURRENCY", "$".to_string()),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::load_with(None, |key| env.get(key).cloned()).unwrap();
        assert_eq!(config.store.name, "Corner");
        assert_eq!(config.store.currency_symbol, "$");
    }

    #[test]
    fn test_load_with_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_with(Some(dir.path().join("absent.toml")), |_| None).unwrap();
        assert_eq!(config.store.name, "Shopkeep Store");
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[store\nname = ").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SHOPKEEP_DB_PATH", "/tmp/shop.db"),
            ("SHOPKEEP_BILLS_DIR", "/tmp/bills"),
            ("SHOPKEEP_STORE_NAME", "Night Market"),
            ("SHOPKEEP_VIEWER", "cat"),
            ("SHOPKEEP_CURRENCY", "$"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.storage.bills_dir, PathBuf::from("/tmp/bills"));
        assert_eq!(config.store.name, "Night Market");
        assert_eq!(config.receipt.viewer.as_deref(), Some("cat"));
        assert_eq!(config.store_info().currency_symbol, "$");
    }

    #[test]
    fn test_empty_viewer_override_disables_viewer() {
        let mut config = AppConfig::default();
        config.receipt.viewer = Some("less".to_string());
        config.apply_overrides(|key| (key == "SHOPKEEP_VIEWER").then(String::new));
        assert!(config.receipt.viewer.is_none());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.bills_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
