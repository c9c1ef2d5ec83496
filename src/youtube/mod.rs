pub mod locator;
pub mod timedtext;

pub use locator::CaptionLocator;
pub use timedtext::fetch_transcript;

use crate::error::{Result, VidaskError};

/// A caption track resolved for one video. The URL is provider-signed and
/// short-lived; it is consumed immediately and never stored.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    pub language: String,
    pub url: String,
    pub auto_generated: bool,
}

/// Extract the 11-character video id from a YouTube URL or a bare id.
///
/// Accepts `watch?v=`, `youtu.be/`, `/shorts/` and `/embed/` shapes.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let url_str = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else if input.contains("youtube.com") || input.contains("youtu.be") {
        format!("https://{}", input)
    } else {
        return Err(VidaskError::Extraction(format!(
            "not a YouTube URL or video id: {}",
            input
        )));
    };

    let url = url::Url::parse(&url_str)
        .map_err(|e| VidaskError::Extraction(format!("invalid URL {}: {}", input, e)))?;

    let host = url.host_str().unwrap_or_default();
    if !is_youtube_host(host) {
        return Err(VidaskError::Extraction(format!(
            "not a YouTube host: {}",
            host
        )));
    }

    // youtube.com/watch?v=<id>
    if let Some(id) = url
        .query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.to_string())
    {
        if is_video_id(&id) {
            return Ok(id);
        }
    }

    // youtu.be/<id>
    if host.eq_ignore_ascii_case("youtu.be") {
        if let Some(id) = url.path_segments().and_then(|mut s| s.next()) {
            if is_video_id(id) {
                return Ok(id.to_string());
            }
        }
    }

    // youtube.com/shorts/<id>, youtube.com/embed/<id>
    if let Some(mut segments) = url.path_segments() {
        let first = segments.next().unwrap_or_default();
        let second = segments.next().unwrap_or_default();
        if (first == "shorts" || first == "embed") && is_video_id(second) {
            return Ok(second.to_string());
        }
    }

    Err(VidaskError::Extraction(format!(
        "no video id in URL: {}",
        input
    )))
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11 && s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com" || h == "youtu.be" || h.ends_with(".youtube.com")
}
