use crate::error::{Result, VidaskError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default timeout applied to every outbound HTTP call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    /// Subtitle language requested from the platform (exact match, no fallback).
    pub language: String,
    /// Base URL of the local Ollama daemon.
    pub ollama_url: String,
    pub request_timeout_secs: u64,
    /// Seed credentials; per-session keys entered via /settings take priority.
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            language: "en".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            gemini_api_key: None,
            openai_api_key: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_file_path())
    }

    fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = path {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                match toml::from_str::<Config>(&contents) {
                    Ok(file_config) => config = file_config,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to parse {}: {}. Using defaults.",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.ollama_url = url;
        }
        if let Ok(lang) = std::env::var("VIDASK_LANGUAGE") {
            config.language = lang;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.language.is_empty() {
            return Err(VidaskError::Config(
                "Subtitle language must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(VidaskError::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }
        if self.ollama_url.is_empty() {
            return Err(VidaskError::Config(
                "Ollama URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vidask").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.language, "en");
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_language() {
        let config = Config {
            language: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            ..Config::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("port = 9000").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.language, "en");
    }
}
