//! User settings for BudgetVault
//!
//! Manages the active user, remote store location, backup location, logging
//! level and display preferences.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::error::BudgetError;

/// Remote document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Whether changes are mirrored to the remote document
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory of the file-backed document store (defaults to `remote/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_dir: Option<PathBuf>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            document_dir: None,
        }
    }
}

/// User settings for BudgetVault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name that namespaces the local cache and keys the remote document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Remote document store
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Where `backup export` writes files (defaults to `backups/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Default `tracing` filter when `BUDGETVAULT_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Currency symbol for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_true() -> bool {
    true
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_currency() -> String {
    "₺".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            username: None,
            remote: RemoteSettings::default(),
            backup_dir: None,
            log_level: default_log_level(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The configured user, or an error telling how to set one
    pub fn require_username(&self) -> Result<&str, BudgetError> {
        self.username.as_deref().ok_or_else(|| {
            BudgetError::Config(
                "No user configured. Run 'budgetvault init --user <NAME>' first.".into(),
            )
        })
    }

    /// Set the active user after validating the name
    pub fn set_username(&mut self, username: &str) -> Result<(), BudgetError> {
        validate_username(username)?;
        self.username = Some(username.to_string());
        Ok(())
    }

    /// Resolved directory of the file-backed remote store
    pub fn remote_dir(&self, paths: &VaultPaths) -> PathBuf {
        self.remote
            .document_dir
            .clone()
            .unwrap_or_else(|| paths.remote_dir())
    }

    /// Resolved directory for exported backups
    pub fn backup_dir(&self, paths: &VaultPaths) -> PathBuf {
        self.backup_dir.clone().unwrap_or_else(|| paths.backup_dir())
    }
}

/// Usernames become file names and cache key prefixes
pub fn validate_username(username: &str) -> Result<(), BudgetError> {
    if username.is_empty() {
        return Err(BudgetError::Validation("Username must not be empty".into()));
    }

    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '@'));
    if !valid || username.starts_with('.') {
        return Err(BudgetError::Validation(format!(
            "Invalid username '{}': use letters, digits, '-', '.' or '@'",
            username
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.username.is_none());
        assert!(settings.remote.enabled);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.require_username().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set_username("ayse").unwrap();
        settings.remote.enabled = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.require_username().unwrap(), "ayse");
        assert!(!loaded.remote.enabled);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"username": "mehmet"}"#).unwrap();
        assert_eq!(settings.schema_version, 1);
        assert!(settings.remote.enabled);
        assert_eq!(settings.currency_symbol, "₺");
    }

    #[test]
    fn test_resolved_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        assert_eq!(settings.remote_dir(&paths), paths.remote_dir());
        assert_eq!(settings.backup_dir(&paths), paths.backup_dir());

        settings.backup_dir = Some(PathBuf::from("/tmp/elsewhere"));
        assert_eq!(settings.backup_dir(&paths), PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ayse").is_ok());
        assert!(validate_username("user-01@home").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("../etc").is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username("a/b").is_err());
    }
}
