use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pricing::{Billing, TIERS};
use crate::slider::DEFAULT_INDEX;

fn default_tier() -> usize {
    DEFAULT_INDEX + 1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Starting tier, 1-based (1 = 10K pageviews)
    #[serde(default = "default_tier")]
    pub default_tier: usize,

    /// Billing period used when none has been saved yet
    #[serde(default)]
    pub default_billing: Billing,

    /// Use the dark theme when no theme has been saved yet
    #[serde(default)]
    pub prefers_dark: bool,

    /// Show the feature list under the price
    #[serde(default = "default_true")]
    pub show_features: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_tier: default_tier(),
            default_billing: Billing::Monthly,
            prefers_dark: false,
            show_features: true,
        }
    }
}

/// `<config_dir>/tierslide`, created if missing
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("tierslide");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!("Could not create config directory: {}", e);
    }
    Some(dir)
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let dir = config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Leave a broken file alone so the user can fix it
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::warn!("Failed to write default config: {}", e);
        }
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(&self.normalized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy with out-of-range values pulled back into range
    pub fn normalized(&self) -> Self {
        let mut clean = self.clone();
        clean.default_tier = clean.default_tier.clamp(1, TIERS.len());
        clean
    }

    /// Starting slider index (0-based)
    pub fn initial_index(&self) -> usize {
        self.normalized().default_tier - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            default_tier: 5,
            default_billing: Billing::Yearly,
            prefers_dark: true,
            show_features: false,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.default_tier, 5);
        assert_eq!(deserialized.default_billing, Billing::Yearly);
        assert!(deserialized.prefers_dark);
        assert!(!deserialized.show_features);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = toml::from_str("prefers_dark = true").unwrap();
        assert_eq!(config.default_tier, 3);
        assert_eq!(config.default_billing, Billing::Monthly);
        assert!(config.show_features);
        assert_eq!(config.initial_index(), 2);
    }

    #[test]
    fn test_tier_out_of_range() {
        let high = AppConfig { default_tier: 42, ..AppConfig::default() };
        assert_eq!(high.initial_index(), 4);
        let zero = AppConfig { default_tier: 0, ..AppConfig::default() };
        assert_eq!(zero.initial_index(), 0);
    }
}
