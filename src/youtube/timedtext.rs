//! Timedtext payload fetch and flattening.
//!
//! The track URL returns `{"events": [{"segs": [{"utf8": ...}]}]}`. Segments
//! within an event concatenate with no separator; events join with a single
//! space. Events without a `segs` array (pure timing markers) are skipped.

use crate::error::{Result, VidaskError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TimedTextPayload {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    segs: Option<Vec<Segment>>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    utf8: Option<String>,
}

/// Fetch the subtitle payload at `track_url` and flatten it into one
/// transcript string.
pub async fn fetch_transcript(client: &reqwest::Client, track_url: &str) -> Result<String> {
    let response = client
        .get(track_url)
        .send()
        .await
        .map_err(|e| VidaskError::SubtitleFetch(format!("request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VidaskError::SubtitleFetch(format!("HTTP {}", status)));
    }

    let body = response
        .text()
        .await
        .map_err(|e| VidaskError::SubtitleFetch(format!("failed to read body: {}", e)))?;

    let payload: TimedTextPayload = serde_json::from_str(&body)
        .map_err(|e| VidaskError::SubtitleFetch(format!("malformed payload: {}", e)))?;

    let transcript = flatten(&payload)?;
    debug!("Flattened {} event(s) into {} chars", payload.events.len(), transcript.len());
    Ok(transcript)
}

/// An event with `segs` contributes the in-order concatenation of its
/// segment texts (possibly empty); an event without `segs` contributes
/// nothing at all. An empty result is treated the same as missing subtitles.
fn flatten(payload: &TimedTextPayload) -> Result<String> {
    let parts: Vec<String> = payload
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .map(|segs| {
            segs.iter()
                .filter_map(|seg| seg.utf8.as_deref())
                .collect::<String>()
        })
        .collect();

    let transcript = parts.join(" ");
    if transcript.is_empty() {
        return Err(VidaskError::EmptyTranscript);
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TimedTextPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_flatten_joins_events_with_space() {
        let payload = parse(
            r#"{"events":[{"segs":[{"utf8":"Hello "},{"utf8":"world"}]},{"segs":[{"utf8":"!"}]}]}"#,
        );
        assert_eq!(flatten(&payload).unwrap(), "Hello world !");
    }

    #[test]
    fn test_flatten_skips_events_without_segs() {
        let payload = parse(
            r#"{"events":[{"tStartMs":0},{"segs":[{"utf8":"only"}]},{"tStartMs":100}]}"#,
        );
        assert_eq!(flatten(&payload).unwrap(), "only");
    }

    #[test]
    fn test_flatten_skips_segments_without_utf8() {
        let payload = parse(r#"{"events":[{"segs":[{"utf8":"a"},{"acAsrConf":0},{"utf8":"b"}]}]}"#);
        assert_eq!(flatten(&payload).unwrap(), "ab");
    }

    #[test]
    fn test_flatten_empty_events_is_error() {
        let payload = parse(r#"{"events":[]}"#);
        assert!(matches!(
            flatten(&payload),
            Err(VidaskError::EmptyTranscript)
        ));
    }

    #[test]
    fn test_flatten_missing_events_is_error() {
        let payload = parse(r#"{}"#);
        assert!(matches!(
            flatten(&payload),
            Err(VidaskError::EmptyTranscript)
        ));
    }

    #[test]
    fn test_flatten_event_with_empty_segs_still_joins() {
        // An event that declares segs but yields no text still takes part in
        // the join, matching the wire behavior of the timedtext format.
        let payload =
            parse(r#"{"events":[{"segs":[{"utf8":"a"}]},{"segs":[]},{"segs":[{"utf8":"b"}]}]}"#);
        assert_eq!(flatten(&payload).unwrap(), "a  b");
    }

    #[test]
    fn test_flatten_single_event() {
        let payload = parse(r#"{"events":[{"segs":[{"utf8":"lone segment"}]}]}"#);
        assert_eq!(flatten(&payload).unwrap(), "lone segment");
    }
}
