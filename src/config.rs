use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::service::Voice;

/// Credentials and model choices for the external collaborators, plus drill
/// defaults. Loaded from the config file, then overridden by environment
/// variables; passed explicitly to whatever needs it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default)]
    pub textgears_api_key: Option<String>,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_check_model")]
    pub check_model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_science_fact_chance")]
    pub science_fact_chance: f64,
    #[serde(default = "default_session")]
    pub session: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_chat_model() -> String {
    "gpt-4-1106-preview".to_string()
}
fn default_check_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_tts_model() -> String {
    "tts-1".to_string()
}
fn default_voice() -> String {
    "onyx".to_string()
}
fn default_language() -> String {
    "fr-FR".to_string()
}
fn default_science_fact_chance() -> f64 {
    0.3
}
fn default_session() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            textgears_api_key: None,
            chat_model: default_chat_model(),
            check_model: default_check_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            language: default_language(),
            science_fact_chance: default_science_fact_chance(),
            session: default_session(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        config.normalize_voice();
        config.normalize_science_fact_chance();
        Ok(config)
    }

    #[allow(dead_code)]
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
            .join("dictee")
            .join("config.toml")
    }

    /// Environment wins over the file, so keys never have to live on disk.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = var("TEXTGEARS_API_KEY") {
            self.textgears_api_key = Some(key);
        }
    }

    /// Reset an unknown voice name to the default. Call after
    /// deserialization so a stale config cannot send a bad name upstream.
    pub fn normalize_voice(&mut self) {
        if Voice::from_name(&self.voice).is_none() {
            self.voice = default_voice();
        }
    }

    /// Clamp the science-fact chance into [0, 1]. TOML accepts `nan` and
    /// `inf` as float literals; non-finite values reset to the default.
    pub fn normalize_science_fact_chance(&mut self) {
        if self.science_fact_chance.is_finite() {
            self.science_fact_chance = self.science_fact_chance.clamp(0.0, 1.0);
        } else {
            self.science_fact_chance = default_science_fact_chance();
        }
    }

    pub fn voice(&self) -> Voice {
        Voice::from_name(&self.voice).unwrap_or_default()
    }
}
