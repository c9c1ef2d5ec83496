//! Local Ollama daemon: generation over its HTTP API, model enumeration via
//! the `ollama list` CLI.

use crate::error::{Result, VidaskError};
use crate::llm::Generator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Generating with Ollama model {}", self.model);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VidaskError::Generation(format!("Ollama request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VidaskError::Generation(format!("failed to read Ollama response: {}", e)))?;

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| VidaskError::Generation(format!("unparsable Ollama response: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(VidaskError::Generation(format!("Ollama error: {}", error)));
        }

        if !status.is_success() {
            return Err(VidaskError::Generation(format!(
                "Ollama API error ({})",
                status
            )));
        }

        parsed
            .response
            .map(|r| r.trim().to_string())
            .ok_or_else(|| VidaskError::Generation("empty Ollama response".to_string()))
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

/// Names of locally installed models, from `ollama list`.
///
/// Display-only: a missing binary or garbled output yields an empty list,
/// never an error.
pub async fn installed_models() -> Vec<String> {
    let output = match tokio::process::Command::new("ollama")
        .arg("list")
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Failed to run `ollama list`: {}", e);
            return Vec::new();
        }
    };

    if !output.status.success() {
        warn!("`ollama list` exited with {}", output.status);
        return Vec::new();
    }

    parse_list_output(&String::from_utf8_lossy(&output.stdout))
}

/// First whitespace-delimited token of every non-empty line.
fn parse_list_output(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| name.to_string())
        .collect()
}
