//! Caption track resolution via the InnerTube player API.
//!
//! The watch page embeds an `INNERTUBE_API_KEY`; posting the player endpoint
//! with that key returns the caption track list, each track carrying a
//! short-lived signed payload URL.

use crate::error::{Result, VidaskError};
use crate::youtube::{extract_video_id, CaptionTrack};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Android client identity for the player request. The Android client gets
/// caption URLs that do not require additional attestation tokens.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

/// Resolves the transient payload URL of a video's caption track.
pub struct CaptionLocator {
    client: reqwest::Client,
    base_url: String,
}

impl CaptionLocator {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the locator at a different host (used by HTTP-level tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve the caption track for `video_url` in `lang`.
    ///
    /// Machine-generated tracks are preferred over human-authored ones; the
    /// language must match exactly, and the first-listed variant wins.
    pub async fn locate(&self, video_url: &str, lang: &str) -> Result<CaptionTrack> {
        let video_id = extract_video_id(video_url)?;
        debug!("Locating '{}' captions for video {}", lang, video_id);

        let html = self.fetch_watch_page(&video_id).await?;
        let api_key = extract_innertube_api_key(&html)?;
        let player = self.fetch_player_response(&video_id, &api_key).await?;

        let tracks = caption_tracks(&player)?;
        debug!("Video {} lists {} caption track(s)", video_id, tracks.len());

        select_track(tracks, lang).ok_or_else(|| {
            warn!("No '{}' caption track for video {}", lang, video_id);
            VidaskError::NoCaptions(lang.to_string())
        })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        let response = self
            .client
            .get(&url)
            .header("Accept-Language", "en-US")
            .send()
            .await
            .map_err(|e| VidaskError::Extraction(format!("watch page request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VidaskError::Extraction(format!(
                "watch page returned HTTP {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| VidaskError::Extraction(format!("failed to read watch page: {}", e)))
    }

    async fn fetch_player_response(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VidaskError::Extraction(format!("player request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VidaskError::Extraction(format!(
                "player endpoint returned HTTP {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VidaskError::Extraction(format!("player response unparsable: {}", e)))
    }
}

fn extract_innertube_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
        .expect("static regex must compile");

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| VidaskError::Extraction("no InnerTube API key in watch page".to_string()))
}

/// Pull the track list out of the player response, verifying the video is
/// playable first.
fn caption_tracks(player: &PlayerResponse) -> Result<&[RawCaptionTrack]> {
    if let Some(status) = &player.playability_status {
        if status.status.as_deref().unwrap_or("OK") != "OK" {
            return Err(VidaskError::Extraction(format!(
                "video not playable: {}",
                status.reason.as_deref().unwrap_or("unknown reason")
            )));
        }
    }

    player
        .captions
        .as_ref()
        .and_then(|c| c.renderer.as_ref())
        .map(|r| r.caption_tracks.as_slice())
        .filter(|tracks| !tracks.is_empty())
        .ok_or_else(|| VidaskError::Extraction("captions disabled for this video".to_string()))
}

/// Exact-language selection: first asr (machine-generated) track in `lang`,
/// else the first human track in `lang`. No fuzzy matching, no fallback to
/// other languages.
fn select_track(tracks: &[RawCaptionTrack], lang: &str) -> Option<CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.is_auto_generated() && t.language_code == lang)
        .or_else(|| tracks.iter().find(|t| t.language_code == lang))
        .map(|t| CaptionTrack {
            language: t.language_code.clone(),
            url: payload_url(&t.base_url),
            auto_generated: t.is_auto_generated(),
        })
}

/// Rewrite the signed track URL to request the JSON events format.
fn payload_url(base_url: &str) -> String {
    format!("{}&fmt=json3", base_url.replace("&fmt=srv3", ""))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    captions: Option<Captions>,
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

impl RawCaptionTrack {
    fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}
