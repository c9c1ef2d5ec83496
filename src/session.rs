//! Per-browser-client session state.
//!
//! Sessions live in an in-process map keyed by a cookie-carried id: created
//! lazily on first contact, mutated on every form submission, dropped only
//! when the process exits.

use crate::llm::Backend;
use dashmap::DashMap;
use std::collections::HashMap;
use uuid::Uuid;

/// One generation exchange. `model` is the backend identifier as submitted.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub model: String,
    pub request: String,
    pub response: String,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub video_url: Option<String>,
    pub transcript: Option<String>,
    /// Most recent entry first.
    pub history: Vec<HistoryEntry>,
    api_keys: HashMap<Backend, String>,
}

impl Session {
    /// Replace the transcript for a newly loaded video. The history belongs
    /// to the previous transcript, so it is cleared in the same step.
    pub fn load_video(&mut self, video_url: String, transcript: String) {
        self.video_url = Some(video_url);
        self.transcript = Some(transcript);
        self.history.clear();
    }

    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
    }

    /// Clear video state and history. Stored API keys survive a reset.
    pub fn reset(&mut self) {
        self.video_url = None;
        self.transcript = None;
        self.history.clear();
    }

    pub fn set_api_key(&mut self, backend: Backend, key: String) {
        self.api_keys.insert(backend, key);
    }

    pub fn api_key(&self, backend: Backend) -> Option<&str> {
        self.api_keys.get(&backend).map(|k| k.as_str())
    }
}

/// In-memory session store shared across requests.
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Return a usable session id: the caller's, when it names a live
    /// session, otherwise a freshly created one.
    pub fn ensure(&self, id: Option<Uuid>) -> Uuid {
        if let Some(id) = id {
            if self.sessions.contains_key(&id) {
                return id;
            }
        }
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::default());
        id
    }

    /// Clone of the session for rendering.
    pub fn snapshot(&self, id: Uuid) -> Option<Session> {
        self.sessions.get(&id).map(|s| s.value().clone())
    }

    /// Mutate the session in place while the map entry is held.
    pub fn modify<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions.get_mut(&id).map(|mut s| f(s.value_mut()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
