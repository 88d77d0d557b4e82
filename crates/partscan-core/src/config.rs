//! Configuration management for Partscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::FacingMode;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/partscan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera acquisition settings
    pub camera: CameraConfig,
    /// Remote lookup route settings
    pub lookup: LookupConfig,
    /// Spreadsheet data source settings
    pub sheets: SheetsConfig,
    /// Lookup route server settings
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `GOOGLE_SHEETS_API_KEY`: Spreadsheet API key (never written to disk)
    /// - `GOOGLE_SPREADSHEET_ID`: Override spreadsheet identifier
    /// - `GOOGLE_SHEET_NAME`: Override sheet (tab) name
    /// - `PARTSCAN_LOOKUP_URL`: Override the lookup route base URL
    /// - `PARTSCAN_BIND`: Override the server bind address
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from an environment lookup function.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GOOGLE_SHEETS_API_KEY").filter(|v| !v.is_empty()) {
            self.sheets.api_key = Some(key);
            tracing::debug!("Loaded sheets.api_key from env");
        }

        if let Some(id) = lookup("GOOGLE_SPREADSHEET_ID").filter(|v| !v.is_empty()) {
            tracing::debug!("Override sheets.spreadsheet_id from env: {}", id);
            self.sheets.spreadsheet_id = id;
        }

        if let Some(name) = lookup("GOOGLE_SHEET_NAME").filter(|v| !v.is_empty()) {
            tracing::debug!("Override sheets.sheet_name from env: {}", name);
            self.sheets.sheet_name = name;
        }

        if let Some(url) = lookup("PARTSCAN_LOOKUP_URL").filter(|v| !v.is_empty()) {
            tracing::debug!("Override lookup.api_base_url from env: {}", url);
            self.lookup.api_base_url = url;
        }

        if let Some(addr) = lookup("PARTSCAN_BIND").filter(|v| !v.is_empty()) {
            tracing::debug!("Override server.bind_addr from env: {}", addr);
            self.server.bind_addr = addr;
        }
    }

    /// Check values that would otherwise fail later at runtime.
    pub fn validate(&self) -> ConfigResult<()> {
        let cam = &self.camera;
        if cam.min_width > cam.max_width || cam.min_height > cam.max_height {
            return Err(ConfigError::InvalidValue {
                field: "camera".to_string(),
                reason: "minimum resolution exceeds maximum".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/partscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "partscan", "partscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Camera acquisition settings.
///
/// The resolution hints feed the first and third rungs of the constraint ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera facing tried first on start
    pub preferred_facing: FacingMode,
    /// Pause between releasing a stream and acquiring the next one
    pub settle_delay_ms: u64,
    /// Minimum acceptable frame width
    pub min_width: u32,
    /// Ideal frame width
    pub ideal_width: u32,
    /// Maximum acceptable frame width
    pub max_width: u32,
    /// Minimum acceptable frame height
    pub min_height: u32,
    /// Ideal frame height
    pub ideal_height: u32,
    /// Maximum acceptable frame height
    pub max_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            preferred_facing: FacingMode::Environment,
            settle_delay_ms: 100,
            min_width: 320,
            ideal_width: 640,
            max_width: 1920,
            min_height: 240,
            ideal_height: 480,
            max_height: 1080,
        }
    }
}

/// Remote lookup route settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL that serves `GET /parts/{token}`
    pub api_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
            user_agent: "Partscan/0.1.0 (+https://github.com/partscan/partscan)".to_string(),
        }
    }
}

/// Spreadsheet data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Base URL of the spreadsheet values API
    pub api_base_url: String,
    /// Spreadsheet identifier
    pub spreadsheet_id: String,
    /// Sheet (tab) holding the parts table
    pub sheet_name: String,
    /// API key (read from the environment, never stored in the config file)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://sheets.googleapis.com/v4".to_string(),
            spreadsheet_id: String::new(),
            sheet_name: "Sheet1".to_string(),
            api_key: None,
        }
    }
}

/// Lookup route server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the route server listens on
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.camera.preferred_facing, FacingMode::Environment);
        assert_eq!(config.camera.settle_delay_ms, 100);
        assert_eq!(config.sheets.sheet_name, "Sheet1");
        assert!(config.sheets.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AppConfig::default();
        config.sheets.api_key = Some("secret".to_string());

        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[camera]"));
        assert!(toml_str.contains("[sheets]"));
        assert!(toml_str.contains("preferred_facing = \"environment\""));
        assert!(!toml_str.contains("secret"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.lookup.api_base_url, config.lookup.api_base_url);
        assert!(parsed.sheets.api_key.is_none());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.camera.preferred_facing = FacingMode::User;
        config.sheets.spreadsheet_id = "sheet-123".to_string();

        config.save_to(&config_path).expect("save config");
        let loaded = AppConfig::load_from(&config_path).expect("load config");

        assert_eq!(loaded.camera.preferred_facing, FacingMode::User);
        assert_eq!(loaded.sheets.spreadsheet_id, "sheet-123");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded =
            AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load defaults");
        assert_eq!(loaded.server.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GOOGLE_SHEETS_API_KEY", "key-1"),
            ("GOOGLE_SPREADSHEET_ID", "spread-1"),
            ("GOOGLE_SHEET_NAME", ""),
            ("PARTSCAN_LOOKUP_URL", "http://parts.local"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.sheets.api_key.as_deref(), Some("key-1"));
        assert_eq!(config.sheets.spreadsheet_id, "spread-1");
        // Empty values are ignored
        assert_eq!(config.sheets.sheet_name, "Sheet1");
        assert_eq!(config.lookup.api_base_url, "http://parts.local");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[camera]
preferred_facing = "user"

[server]
bind_addr = "0.0.0.0:9000"
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.camera.preferred_facing, FacingMode::User);
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        // These should be defaults
        assert_eq!(config.camera.max_width, 1920);
        assert_eq!(config.lookup.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_inverted_resolution() {
        let mut config = AppConfig::default();
        config.camera.min_width = 4000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "camera"
        ));
    }

    #[test]
    fn test_history_size_is_not_configurable() {
        let toml_str = r#"
[session]
history_capacity = 10
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("unknown sections are ignored");
        let serialized = toml::to_string_pretty(&config).expect("serialize config");
        assert!(!serialized.contains("history_capacity"));
    }
}
