use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    warn,
};

use crate::persistence::{
    get_data_file_path,
    load_json_or_default,
    save_json,
};

pub const CONFIG_FILE: &str = "config.json";
pub const CONTENT_ENV_VAR: &str = "LECTIO_CONTENT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path or `http(s)://` URL of the catalog document.
    pub content_source: String,
    pub skim_tick_ms: u64,
    /// Reading speed slider position, 100 = 1.0x.
    pub default_speed: u32,
    pub speech: SpeechSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_source: "books.json".to_string(),
            skim_tick_ms: 20,
            default_speed: 100,
            speech: SpeechSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reads `config.json`, writing the defaults out on first run so they can be edited.
    pub fn load() -> Self {
        let mut config = load_json_or_default::<AppConfig>(CONFIG_FILE);
        if !get_data_file_path(CONFIG_FILE).exists() {
            if let Err(e) = save_json(&config, CONFIG_FILE) {
                warn!(error = %e, "could not write default config");
            }
        }

        if let Ok(source) = std::env::var(CONTENT_ENV_VAR) {
            if !source.trim().is_empty() {
                info!(source = %source, "content source overridden from environment");
                config.content_source = source;
            }
        }
        config
    }

    pub fn skim_interval(&self) -> Duration {
        Duration::from_millis(self.skim_tick_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub program: String,
    /// Speaking speed at 1.0x.
    pub words_per_minute: u32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self { enabled: true, program: "espeak-ng".to_string(), words_per_minute: 175 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "content_source": "https://example.org/books.json" }"#)
                .unwrap();

        assert_eq!(config.content_source, "https://example.org/books.json");
        assert_eq!(config.skim_tick_ms, 20);
        assert_eq!(config.default_speed, 100);
        assert_eq!(config.speech, SpeechSettings::default());
    }

    #[test]
    fn test_skim_interval_never_zero() {
        let config = AppConfig { skim_tick_ms: 0, ..AppConfig::default() };
        assert_eq!(config.skim_interval(), Duration::from_millis(1));
    }
}
