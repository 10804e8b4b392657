//! Configuration
//!
//! Timing constants, skip links and landmark shortcuts, loadable from TOML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shortcuts::KeyboardShortcut;

/// Accessibility layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    /// How long an announcement stays in the announcer before it is cleared
    pub announce_clear_delay_ms: u64,
    /// How long a temporary `tabindex="-1"` stays on a skip-link target
    pub skip_link_release_delay_ms: u64,
    /// Render skip links into `<body>` when the provider mounts
    pub render_skip_links: bool,
    /// Move focus to the main landmark after a route change
    pub focus_main_on_navigation: bool,
    /// Id of the main landmark
    pub main_landmark_id: String,
    pub skip_links: Vec<SkipLinkConfig>,
    pub landmark_shortcuts: Vec<LandmarkShortcutConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipLinkConfig {
    pub target_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkShortcutConfig {
    /// Key combination such as `"Alt+1"`
    pub keys: String,
    pub target_id: String,
    pub label: String,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            announce_clear_delay_ms: 1000,
            skip_link_release_delay_ms: 100,
            render_skip_links: true,
            focus_main_on_navigation: true,
            main_landmark_id: "main-content".to_string(),
            skip_links: vec![
                SkipLinkConfig::new("main-content", "Skip to main content"),
                SkipLinkConfig::new("main-navigation", "Skip to navigation"),
                SkipLinkConfig::new("site-footer", "Skip to footer"),
            ],
            landmark_shortcuts: vec![
                LandmarkShortcutConfig::new("Alt+1", "main-content", "main content"),
                LandmarkShortcutConfig::new("Alt+2", "main-navigation", "navigation"),
                LandmarkShortcutConfig::new("Alt+3", "site-footer", "footer"),
            ],
        }
    }
}

impl SkipLinkConfig {
    pub fn new(target_id: &str, label: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            label: label.to_string(),
        }
    }
}

impl LandmarkShortcutConfig {
    pub fn new(keys: &str, target_id: &str, label: &str) -> Self {
        Self {
            keys: keys.to_string(),
            target_id: target_id.to_string(),
            label: label.to_string(),
        }
    }
}

impl A11yConfig {
    pub fn announce_clear_delay(&self) -> Duration {
        Duration::from_millis(self.announce_clear_delay_ms)
    }

    pub fn skip_link_release_delay(&self) -> Duration {
        Duration::from_millis(self.skip_link_release_delay_ms)
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded accessibility config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.announce_clear_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "announce_clear_delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.main_landmark_id.trim().is_empty() {
            return Err(ConfigError::Invalid("main_landmark_id is empty".to_string()));
        }
        if let Some(link) = self.skip_links.iter().find(|l| l.target_id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "skip link \"{}\" has no target id",
                link.label
            )));
        }
        for shortcut in &self.landmark_shortcuts {
            if KeyboardShortcut::parse(&shortcut.keys).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "unrecognised shortcut \"{}\"",
                    shortcut.keys
                )));
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = A11yConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(A11yConfig::from_toml_str(&text).unwrap(), config);
        assert_eq!(config.announce_clear_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = A11yConfig::from_toml_str("announce_clear_delay_ms = 250\n").unwrap();
        assert_eq!(config.announce_clear_delay_ms, 250);
        assert_eq!(config.skip_link_release_delay_ms, 100);
        assert_eq!(config.skip_links.len(), 3);
    }

    #[test]
    fn test_custom_skip_links() {
        let toml = r#"
            render_skip_links = false

            [[skip_links]]
            target_id = "catalog"
            label = "Skip to products"
        "#;
        let config = A11yConfig::from_toml_str(toml).unwrap();
        assert!(!config.render_skip_links);
        assert_eq!(config.skip_links, [SkipLinkConfig::new("catalog", "Skip to products")]);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            A11yConfig::from_toml_str("announce_clear_delay_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        let bad_shortcut = r#"
            [[landmark_shortcuts]]
            keys = "Alt+"
            target_id = "main-content"
            label = "main"
        "#;
        assert!(matches!(
            A11yConfig::from_toml_str(bad_shortcut),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            A11yConfig::from_toml_str("announce_clear_delay_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
