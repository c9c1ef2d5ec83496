pub mod gemini;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use crate::error::{Result, VidaskError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The closed set of text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Gemini,
    OpenAi,
    Ollama,
}

impl Backend {
    /// Backends that require an API key; Ollama talks to a local daemon.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Backend::Gemini | Backend::OpenAi)
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Gemini => write!(f, "gemini"),
            Backend::OpenAi => write!(f, "openai"),
            Backend::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = VidaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Backend::Gemini),
            "openai" => Ok(Backend::OpenAi),
            "ollama" => Ok(Backend::Ollama),
            _ => Err(VidaskError::InvalidBackend(s.to_string())),
        }
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// The single prompt template. Every call is stateless; no chat history or
/// system prompt is carried.
pub fn build_prompt(transcript: &str, instruction: &str) -> String {
    format!(
        "Based on the following transcript, {}:\n\n{}",
        instruction, transcript
    )
}

/// Build the generator for `backend`. Cloud backends need a non-empty API
/// key; its absence is a configuration error the caller surfaces by sending
/// the user to the settings page.
pub fn create_generator(
    backend: Backend,
    model_name: &str,
    api_key: Option<&str>,
    ollama_url: &str,
    client: reqwest::Client,
) -> Result<Box<dyn Generator>> {
    match backend {
        Backend::Gemini => {
            let key = require_key(backend, api_key)?;
            Ok(Box::new(GeminiClient::new(client, key, model_name)))
        }
        Backend::OpenAi => {
            let key = require_key(backend, api_key)?;
            Ok(Box::new(OpenAiClient::new(client, key, model_name)))
        }
        Backend::Ollama => Ok(Box::new(OllamaClient::new(client, ollama_url, model_name))),
    }
}

fn require_key(backend: Backend, api_key: Option<&str>) -> Result<String> {
    match api_key {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(VidaskError::MissingApiKey(backend)),
    }
}
