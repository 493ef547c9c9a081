//! Local settings for the report store and reconciliation defaults.
//!
//! Reads `<config_dir>/dash/config.toml`. A missing file means defaults.

use std::path::{Path, PathBuf};

use dash_recon::ReconConfig;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// Report store API base, without a trailing slash.
    pub api_base: String,
    pub timeout_secs: u64,
    /// Reconciliation overrides; same shape as a standalone recon config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recon: Option<ReconConfig>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            timeout_secs: 60,
            recon: None,
        }
    }
}

impl StoreSettings {
    pub fn from_toml(input: &str) -> Result<Self, StoreError> {
        let settings: StoreSettings =
            toml::from_str(input).map_err(|e| StoreError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoreError::Io(format!("{}: {e}", path.display()))),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(StoreError::Settings(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Settings("timeout_secs must be positive".into()));
        }
        if let Some(recon) = &self.recon {
            recon.validate().map_err(|e| StoreError::Settings(e.to_string()))?;
        }
        Ok(())
    }

    pub fn recon_config(&self) -> ReconConfig {
        self.recon.clone().unwrap_or_default()
    }
}

/// Returns the path to the settings file.
pub fn settings_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("dash/config.toml"))
}

/// Load settings from the default location.
pub fn load_settings() -> Result<StoreSettings, StoreError> {
    match settings_file_path() {
        Some(path) => StoreSettings::load(&path),
        None => Ok(StoreSettings::default()),
    }
}

/// Write settings to `path`, creating the parent directory if needed.
pub fn save_settings(path: &Path, settings: &StoreSettings) -> Result<(), StoreError> {
    settings.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::Io(format!("failed to create config directory: {e}")))?;
    }
    let contents =
        toml::to_string_pretty(settings).map_err(|e| StoreError::Settings(e.to_string()))?;
    std::fs::write(path, contents)
        .map_err(|e| StoreError::Io(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = StoreSettings::from_toml("").unwrap();
        assert_eq!(s.api_base, DEFAULT_API_BASE);
        assert_eq!(s.timeout_secs, 60);
        assert_eq!(s.recon_config(), ReconConfig::default());
    }

    #[test]
    fn recon_table() {
        let s = StoreSettings::from_toml(
            "api_base = \"https://dash.example.com/api\"\n\n[recon.expiry]\nwarning_days = 10\n",
        )
        .unwrap();
        assert_eq!(s.recon_config().expiry.warning_days, 10);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(StoreSettings::from_toml("api_base = \"ftp://x\"").is_err());
        assert!(StoreSettings::from_toml("timeout_secs = 0").is_err());
        assert!(StoreSettings::from_toml("[recon.expiry]\nwarning_days = 9999\n").is_err());
        assert!(StoreSettings::from_toml("token = \"x\"").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let s = StoreSettings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(s, StoreSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash/config.toml");
        let settings = StoreSettings {
            api_base: "https://reports.internal/api".into(),
            timeout_secs: 15,
            recon: None,
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(StoreSettings::load(&path).unwrap(), settings);
    }
}
