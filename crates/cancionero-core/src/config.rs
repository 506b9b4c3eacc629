use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the song resources live.  The loader requests
/// `<base_url>/songs/index.json` and `<base_url>/songs/<file>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Prefix list rows with the song's ordinal ("12. Title").
    #[serde(default = "default_show_numbers")]
    pub show_numbers: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_numbers: default_show_numbers(),
        }
    }
}

fn default_base_url() -> String {
    // A plain `python -m http.server` in the songbook folder serves this.
    "http://127.0.0.1:8000".to_string()
}

fn default_show_numbers() -> bool {
    true
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "http://127.0.0.1:8000");
        assert!(config.ui.show_numbers);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[source]\nbase_url = \"http://songs.local\"\n").unwrap();
        assert_eq!(config.source.base_url, "http://songs.local");
        assert!(config.ui.show_numbers);

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.source.base_url = "http://10.0.0.5:8080".to_string();
        config.ui.show_numbers = false;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.source.base_url, "http://10.0.0.5:8080");
        assert!(!back.ui.show_numbers);
    }
}
