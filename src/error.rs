use crate::llm::Backend;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidaskError {
    #[error("No captions available in language '{0}'")]
    NoCaptions(String),

    #[error("Caption extraction failed: {0}")]
    Extraction(String),

    #[error("Subtitle fetch failed: {0}")]
    SubtitleFetch(String),

    #[error("Subtitle payload produced an empty transcript")]
    EmptyTranscript,

    #[error("No API key configured for {0}")]
    MissingApiKey(Backend),

    #[error("Unknown backend: {0}")]
    InvalidBackend(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("No transcript loaded")]
    NoTranscript,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VidaskError {
    /// Render-safe message for the web boundary. Every variant maps to text
    /// the page can show as-is; nothing propagates past the handlers.
    pub fn user_message(&self) -> String {
        match self {
            VidaskError::NoCaptions(_) | VidaskError::Extraction(_) => {
                "Could not extract subtitles. Try another video.".to_string()
            }
            VidaskError::SubtitleFetch(_) | VidaskError::EmptyTranscript => {
                "No subtitles found for this video.".to_string()
            }
            VidaskError::NoTranscript => "Please load a video first!".to_string(),
            VidaskError::InvalidBackend(_) => "Invalid model selected.".to_string(),
            VidaskError::Generation(details) => {
                format!("Error processing request: {}", details)
            }
            other => format!("Error processing request: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, VidaskError>;
