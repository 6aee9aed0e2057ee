//! HTTP API for the operator UI
//!
//! Thin axum layer over the stores: the UI posts reference text, staging
//! commands and style changes, and subscribes to `/api/v1/events` for the
//! operator event stream.

pub mod handlers;
pub mod sse;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::events::EventBus;
use crate::history::LookupHistory;
use crate::liveness::SurfaceRegistry;
use crate::selection::RapidSelector;
use crate::staging::StagingStore;
use crate::styles::StyleStore;
use vcast_common::corpus::CorpusIndex;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<CorpusIndex>,
    pub staging: Arc<StagingStore>,
    pub styles: Arc<StyleStore>,
    pub registry: Arc<SurfaceRegistry>,
    pub history: Arc<LookupHistory>,
    pub selector: Arc<Mutex<RapidSelector>>,
    pub events: EventBus,
    /// Direct mode bypasses the preview slot
    pub direct_mode: bool,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/v1",
            Router::new()
                // Reference lookup and content staging
                .route("/lookup", post(handlers::lookup))
                .route("/video", post(handlers::stage_video))
                .route("/note", post(handlers::stage_note))
                .route("/publish", post(handlers::publish))
                .route("/clear", post(handlers::clear))
                // Display styling
                .route("/style", post(handlers::set_style))
                // Rapid selection
                .route("/selection/input", post(handlers::selection_input))
                .route("/selection/key", post(handlers::selection_key))
                .route("/selection/choose", post(handlers::selection_choose))
                // Status and history
                .route("/status", get(handlers::status))
                .route("/history", get(handlers::history))
                // SSE events
                .route("/events", get(sse::event_stream)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "vcast-operator",
        "version": env!("CARGO_PKG_VERSION"),
        "direct_mode": state.direct_mode,
        "translations": state.corpus.loaded(),
    }))
}
