//! Web layer: router, form handlers, and HTML views.

pub mod handlers;
pub mod render;

use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/ollama_models", get(handlers::ollama_models))
        .route(
            "/settings",
            get(handlers::settings_page).post(handlers::save_settings),
        )
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
