//! Form handlers. Every core failure is caught here and converted into a
//! rendered page or a redirect; nothing propagates as an unhandled fault.

use axum::extract::{Form, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::VidaskError;
use crate::llm::{self, Backend};
use crate::session::{HistoryEntry, Session};
use crate::state::AppState;
use crate::web::render::{self, IndexView};
use crate::youtube;

const SESSION_COOKIE: &str = "sid";

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub reset: Option<String>,
    pub user_request: Option<String>,
    pub model: Option<String>,
    pub model_name: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let sid = state.sessions.ensure(session_id(&headers));
    let session = state.sessions.snapshot(sid).unwrap_or_default();
    let models = llm::ollama::installed_models().await;

    let view = IndexView {
        video_url: session.video_url.as_deref(),
        history: &session.history,
        ollama_models: &models,
        ..IndexView::default()
    };
    page_response(sid, render::index_page(&view))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AskForm>,
) -> Response {
    let sid = state.sessions.ensure(session_id(&headers));

    if form.reset.is_some() {
        state.sessions.modify(sid, |s| s.reset());
        return redirect_response(sid, "/");
    }

    let models = llm::ollama::installed_models().await;
    let model_field = form.model.clone().unwrap_or_default();

    // A submitted video URL (re)loads the transcript before anything else;
    // success replaces the transcript and wipes the history in one step.
    if let Some(video_url) = form.video_url.as_deref().filter(|u| !u.trim().is_empty()) {
        match load_transcript(&state, video_url).await {
            Ok(transcript) => {
                debug!("Loaded transcript ({} chars) for {}", transcript.len(), video_url);
                state
                    .sessions
                    .modify(sid, |s| s.load_video(video_url.to_string(), transcript));
            }
            Err(e) => {
                warn!("Video load failed for {}: {}", video_url, e);
                let message = e.user_message();
                let view = IndexView {
                    error: Some(&message),
                    selected_model: selected(&model_field),
                    ollama_models: &models,
                    ..IndexView::default()
                };
                return page_response(sid, render::index_page(&view));
            }
        }
    }

    let session = state.sessions.snapshot(sid).unwrap_or_default();
    let Some(transcript) = session.transcript.clone() else {
        // Rejected before any backend call.
        let message = VidaskError::NoTranscript.user_message();
        let view = IndexView {
            error: Some(&message),
            selected_model: selected(&model_field),
            ollama_models: &models,
            ..IndexView::default()
        };
        return page_response(sid, render::index_page(&view));
    };

    let instruction = form.user_request.clone().unwrap_or_default();
    let result = match model_field.parse::<Backend>() {
        Ok(backend) => {
            let api_key = resolve_api_key(&state, &session, backend);
            if backend.requires_api_key() && api_key.is_none() {
                return redirect_response(sid, "/settings");
            }
            run_generation(
                &state,
                backend,
                form.model_name.as_deref().unwrap_or_default(),
                api_key.as_deref(),
                &transcript,
                &instruction,
            )
            .await
        }
        Err(e) => e.user_message(),
    };

    state.sessions.modify(sid, |s| {
        s.push_history(HistoryEntry {
            model: model_field.clone(),
            request: instruction.clone(),
            response: result.clone(),
        })
    });

    let session = state.sessions.snapshot(sid).unwrap_or_default();
    let view = IndexView {
        result: Some(&result),
        video_url: session.video_url.as_deref(),
        selected_model: selected(&model_field),
        history: &session.history,
        ollama_models: &models,
        ..IndexView::default()
    };
    page_response(sid, render::index_page(&view))
}

pub async fn ollama_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: llm::ollama::installed_models().await,
    })
}

pub async fn settings_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let sid = state.sessions.ensure(session_id(&headers));
    let session = state.sessions.snapshot(sid).unwrap_or_default();

    page_response(
        sid,
        render::settings_page(
            session.api_key(Backend::Gemini),
            session.api_key(Backend::OpenAi),
        ),
    )
}

pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SettingsForm>,
) -> Response {
    let sid = state.sessions.ensure(session_id(&headers));
    let api_key = form.api_key.unwrap_or_default();

    if let Ok(backend) = form.model.as_deref().unwrap_or_default().parse::<Backend>() {
        if backend.requires_api_key() && !api_key.is_empty() {
            state
                .sessions
                .modify(sid, |s| s.set_api_key(backend, api_key));
            return redirect_response(sid, "/");
        }
    }

    let session = state.sessions.snapshot(sid).unwrap_or_default();
    page_response(
        sid,
        render::settings_page(
            session.api_key(Backend::Gemini),
            session.api_key(Backend::OpenAi),
        ),
    )
}

/// Locator + fetcher, chained; the caller maps the error to a page.
async fn load_transcript(state: &AppState, video_url: &str) -> crate::error::Result<String> {
    let track = state
        .locator
        .locate(video_url, &state.config.language)
        .await?;
    debug!(
        "Resolved '{}' caption track (auto-generated: {})",
        track.language, track.auto_generated
    );
    youtube::fetch_transcript(&state.http, &track.url).await
}

/// Run one stateless generation; failures come back as render-safe text so
/// the page always has something to show.
async fn run_generation(
    state: &AppState,
    backend: Backend,
    model_name: &str,
    api_key: Option<&str>,
    transcript: &str,
    instruction: &str,
) -> String {
    let prompt = llm::build_prompt(transcript, instruction);

    let outcome = match llm::create_generator(
        backend,
        model_name,
        api_key,
        &state.config.ollama_url,
        state.http.clone(),
    ) {
        Ok(generator) => generator.generate(&prompt).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => text,
        Err(e) => {
            warn!("Generation with {} failed: {}", backend, e);
            e.user_message()
        }
    }
}

fn resolve_api_key(state: &AppState, session: &Session, backend: Backend) -> Option<String> {
    let seed = match backend {
        Backend::Gemini => state.config.gemini_api_key.as_deref(),
        Backend::OpenAi => state.config.openai_api_key.as_deref(),
        Backend::Ollama => None,
    };
    session
        .api_key(backend)
        .or(seed)
        .map(|key| key.to_string())
}

fn selected(model_field: &str) -> Option<&str> {
    if model_field.is_empty() {
        None
    } else {
        Some(model_field)
    }
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

fn page_response(sid: Uuid, body: String) -> Response {
    ([(header::SET_COOKIE, session_cookie(sid))], Html(body)).into_response()
}

fn redirect_response(sid: Uuid, to: &str) -> Response {
    ([(header::SET_COOKIE, session_cookie(sid))], Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_id_parsing() {
        let id = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("other=x; sid={}; more=y", id));
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_missing_or_invalid() {
        assert_eq!(session_id(&HeaderMap::new()), None);
        let headers = headers_with_cookie("sid=not-a-uuid");
        assert_eq!(session_id(&headers), None);
        let headers = headers_with_cookie("other=x");
        assert_eq!(session_id(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(Uuid::nil());
        assert!(cookie.starts_with("sid="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_resolve_api_key_prefers_session() {
        let state = AppState::new(crate::config::Config {
            gemini_api_key: Some("seed".to_string()),
            ..Default::default()
        })
        .unwrap();

        let mut session = Session::default();
        assert_eq!(
            resolve_api_key(&state, &session, Backend::Gemini).as_deref(),
            Some("seed")
        );

        session.set_api_key(Backend::Gemini, "mine".to_string());
        assert_eq!(
            resolve_api_key(&state, &session, Backend::Gemini).as_deref(),
            Some("mine")
        );

        assert_eq!(resolve_api_key(&state, &session, Backend::Ollama), None);
    }
}
