//! Shared application state: configuration, the session map, and the
//! outbound HTTP client every component borrows.

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionStore;
use crate::youtube::CaptionLocator;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub locator: CaptionLocator,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let locator = CaptionLocator::new(http.clone());

        Ok(Self {
            config,
            sessions: SessionStore::new(),
            locator,
            http,
        })
    }

    /// Swap the locator (tests point it at a local mock server).
    pub fn with_locator(mut self, locator: CaptionLocator) -> Self {
        self.locator = locator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_creation() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(state.config.port, 8080);
    }
}
