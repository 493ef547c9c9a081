use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Upper bound for the expiry warning window.
pub const MAX_WARNING_DAYS: u32 = 365;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Reconciliation settings. Every section is optional; an empty document
/// yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub expiry: ExpiryConfig,
    pub matching: MatchingConfig,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Days-to-expiry classification. `0..=warning_days` is a warning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpiryConfig {
    pub warning_days: u32,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self { warning_days: 30 }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Operator fallback chain. License matching always runs first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub name_fallback: bool,
    pub first_operator_fallback: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            name_fallback: true,
            first_operator_fallback: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Rendered for missing values and indeterminate arithmetic.
    pub placeholder: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { placeholder: "—".into() }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ReconError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.expiry.warning_days > MAX_WARNING_DAYS {
            return Err(ReconError::ConfigValidation(format!(
                "expiry.warning_days must be at most {MAX_WARNING_DAYS}, got {}",
                self.expiry.warning_days
            )));
        }

        if self.display.placeholder.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "display.placeholder must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config, ReconConfig::default());
        assert_eq!(config.expiry.warning_days, 30);
        assert!(config.matching.name_fallback);
        assert!(config.matching.first_operator_fallback);
        assert_eq!(config.display.placeholder, "—");
    }

    #[test]
    fn parse_full() {
        let config = ReconConfig::from_toml(
            r#"
[expiry]
warning_days = 45

[matching]
name_fallback = false

[display]
placeholder = "n/a"
"#,
        )
        .unwrap();
        assert_eq!(config.expiry.warning_days, 45);
        assert!(!config.matching.name_fallback);
        assert!(config.matching.first_operator_fallback);
        assert_eq!(config.display.placeholder, "n/a");
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ReconConfig::from_toml("[expiry]\nwarn_days = 10\n");
        assert!(matches!(err, Err(ReconError::ConfigParse(_))));
    }

    #[test]
    fn rejects_wide_warning_window() {
        let err = ReconConfig::from_toml("[expiry]\nwarning_days = 400\n").unwrap_err();
        assert!(err.to_string().contains("warning_days"));
    }

    #[test]
    fn rejects_blank_placeholder() {
        let err = ReconConfig::from_toml("[display]\nplaceholder = \"  \"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon.toml");
        std::fs::write(&path, "[expiry]\nwarning_days = 14\n").unwrap();
        let config = ReconConfig::load(&path).unwrap();
        assert_eq!(config.expiry.warning_days, 14);

        let missing = ReconConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ReconError::Io(_))));
    }
}
