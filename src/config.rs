use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_source_lang() -> String {
    "en".to_string()
}
fn default_target_lang() -> String {
    "fr".to_string()
}
fn default_log_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postedit")
        .join("logs")
        .to_string_lossy()
        .to_string()
}
fn default_api_endpoint() -> String {
    "https://api.translation.example/v2".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            log_dir: default_log_dir(),
            api_endpoint: default_api_endpoint(),
            api_key: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("postedit")
            .join("config.toml")
    }

    /// Language tags are lowercased codes; fall back to the defaults when a
    /// config file carries an empty value.
    pub fn normalize_langs(&mut self) {
        self.source_lang = self.source_lang.trim().to_lowercase();
        self.target_lang = self.target_lang.trim().to_lowercase();
        if self.source_lang.is_empty() {
            self.source_lang = default_source_lang();
        }
        if self.target_lang.is_empty() {
            self.target_lang = default_target_lang();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.source_lang, "en");
        assert_eq!(config.target_lang, "fr");
        assert!(config.api_key.is_none());
        assert!(config.log_dir.contains("logs"));
    }

    #[test]
    fn test_config_serde_partial_file_keeps_defaults() {
        let toml_str = r#"
theme = "catppuccin-mocha"
target_lang = "de"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.target_lang, "de");
        assert_eq!(config.source_lang, "en");
        assert!(!config.api_endpoint.is_empty());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.api_key = Some("secret".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.api_key, deserialized.api_key);
        assert_eq!(config.log_dir, deserialized.log_dir);
    }

    #[test]
    fn test_normalize_langs_lowercases_and_backfills() {
        let mut config = Config::default();
        config.source_lang = " EN ".to_string();
        config.target_lang = String::new();
        config.normalize_langs();
        assert_eq!(config.source_lang, "en");
        assert_eq!(config.target_lang, "fr");
    }
}
