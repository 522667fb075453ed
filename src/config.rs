use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_audio_enabled")]
    pub audio_enabled: bool,
    #[serde(default = "default_tone_volume")]
    pub tone_volume: f32,
    #[serde(default = "default_hint_model")]
    pub hint_model: String,
    #[serde(default)]
    pub hint_api_key: Option<String>,
    #[serde(default = "default_hint_timeout_secs")]
    pub hint_timeout_secs: u64,
    #[serde(default = "default_require_connection")]
    pub require_connection: bool,
    #[serde(default = "default_connectivity_probe_secs")]
    pub connectivity_probe_secs: u64,
}

fn default_audio_enabled() -> bool {
    true
}
fn default_tone_volume() -> f32 {
    0.4
}
fn default_hint_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_hint_timeout_secs() -> u64 {
    10
}
fn default_require_connection() -> bool {
    true
}
fn default_connectivity_probe_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_enabled: default_audio_enabled(),
            tone_volume: default_tone_volume(),
            hint_model: default_hint_model(),
            hint_api_key: None,
            hint_timeout_secs: default_hint_timeout_secs(),
            require_connection: default_require_connection(),
            connectivity_probe_secs: default_connectivity_probe_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_toml(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.validate();
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ditdah")
            .join("config.toml")
    }

    /// Clamp values an edited file may have pushed out of range.
    pub fn validate(&mut self) {
        if !self.tone_volume.is_finite() {
            self.tone_volume = default_tone_volume();
        }
        self.tone_volume = self.tone_volume.clamp(0.0, 1.0);
        self.hint_timeout_secs = self.hint_timeout_secs.max(1);
        self.connectivity_probe_secs = self.connectivity_probe_secs.max(1);
        if self.hint_model.trim().is_empty() {
            self.hint_model = default_hint_model();
        }
    }

    /// Key from the config file, else the first non-empty env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.hint_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_VARS
                    .iter()
                    .filter_map(|var| env::var(var).ok())
                    .find(|k| !k.trim().is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.audio_enabled);
        assert_eq!(config.tone_volume, 0.4);
        assert_eq!(config.hint_model, "gemini-2.5-flash");
        assert_eq!(config.hint_api_key, None);
        assert_eq!(config.hint_timeout_secs, 10);
        assert!(config.require_connection);
        assert_eq!(config.connectivity_probe_secs, 15);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
audio_enabled = false
hint_model = "gemini-2.0-flash"
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert!(!config.audio_enabled);
        assert_eq!(config.hint_model, "gemini-2.0-flash");
        assert_eq!(config.tone_volume, 0.4);
        assert!(config.require_connection);
    }

    #[test]
    fn test_api_key_read_from_file() {
        let config = Config::from_toml(r#"hint_api_key = "abc""#).unwrap();
        assert_eq!(config.hint_api_key.as_deref(), Some("abc"));
        assert_eq!(config.resolve_api_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_validate_clamps_out_of_range_values() {
        let toml_str = r#"
tone_volume = 3.5
hint_timeout_secs = 0
connectivity_probe_secs = 0
hint_model = "  "
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.tone_volume, 1.0);
        assert_eq!(config.hint_timeout_secs, 1);
        assert_eq!(config.connectivity_probe_secs, 1);
        assert_eq!(config.hint_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_negative_volume_clamps_to_zero() {
        let config = Config::from_toml("tone_volume = -1.0").unwrap();
        assert_eq!(config.tone_volume, 0.0);
    }

    #[test]
    fn test_configured_key_wins_over_env() {
        let mut config = Config::default();
        config.hint_api_key = Some("from-file".to_string());
        assert_eq!(config.resolve_api_key().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml("tone_volume = \"loud\"").is_err());
    }
}
