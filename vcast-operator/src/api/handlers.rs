//! Request handlers for the operator API

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::Error;
use crate::history::HistoryEntry;
use crate::liveness::SurfaceInfo;
use crate::selection::{KeyInput, SelectionUpdate};
use vcast_common::corpus::TranslationId;
use vcast_common::media::{self, MediaKind};
use vcast_common::messages::{ContentItem, StyleProperty};
use vcast_common::reference;
use vcast_common::resolver::{self, ResolutionGap};

/// Error payload for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub reference: String,
    pub translations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub content: ContentItem,
    /// Translations that could not supply part of the request; the blocks
    /// that did resolve are still in `content`
    pub gaps: Vec<ResolutionGap>,
    /// True when direct mode sent the content straight live
    pub live: bool,
}

/// Parse and resolve a reference line, then stage it (or send it straight
/// live in direct mode)
pub async fn lookup(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let translations = parse_translations(&request.translations)?;
    let references = reference::parse(&request.reference)
        .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let resolved = resolver::resolve_batch(&state.corpus, &references, &translations);
    if resolved.is_empty() {
        return Err(reject(
            StatusCode::NOT_FOUND,
            format!(
                "\"{}\" not found in any selected translation",
                request.reference.trim()
            ),
        ));
    }

    let content = ContentItem::Verse {
        references: references.clone(),
        translations: translations.clone(),
        blocks: resolved.blocks,
    };
    stage_or_go_live(&state, content.clone()).await;
    state
        .history
        .record(request.reference.trim(), references, translations)
        .await;

    Ok(Json(LookupResponse {
        content,
        gaps: resolved.gaps,
        live: state.direct_mode,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub url: String,
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

fn default_autoplay() -> bool {
    true
}

/// Stage a video content item from a platform URL or bare id
pub async fn stage_video(
    State(state): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<ContentItem>, ApiError> {
    let video_id = media::parse_video_id(&request.url).ok_or_else(|| {
        reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("not a video URL or id: \"{}\"", request.url.trim()),
        )
    })?;
    let content = ContentItem::Video {
        video_id,
        autoplay: request.autoplay,
    };
    stage_or_go_live(&state, content.clone()).await;
    Ok(Json(content))
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    /// Body already rendered to HTML by the external markup renderer
    pub body_html: String,
}

/// Stage a note content item
pub async fn stage_note(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<ContentItem>, ApiError> {
    if request.body_html.trim().is_empty() {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "empty note body"));
    }
    let content = ContentItem::Note {
        title: request.title,
        body_html: request.body_html,
    };
    stage_or_go_live(&state, content.clone()).await;
    Ok(Json(content))
}

/// Copy the preview slot live
pub async fn publish(State(state): State<AppState>) -> Result<Json<ContentItem>, ApiError> {
    match state.staging.publish().await {
        Ok(content) => Ok(Json(content)),
        Err(Error::EmptyPreview) => Err(reject(
            StatusCode::CONFLICT,
            Error::EmptyPreview.to_string(),
        )),
        Err(e) => Err(reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// Empty both slots and blank the surfaces
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.staging.clear().await;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct StyleRequest {
    pub property: StyleProperty,
    pub value: String,
}

/// Set one display style property
pub async fn set_style(
    State(state): State<AppState>,
    Json(request): Json<StyleRequest>,
) -> Result<StatusCode, ApiError> {
    let media_kind = match request.property {
        StyleProperty::BackgroundImage => Some(MediaKind::Image),
        StyleProperty::BackgroundVideo => Some(MediaKind::Video),
        _ => None,
    };
    if let Some(kind) = media_kind {
        media::validate_media_url(&request.value, kind)
            .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    }
    state.styles.set(request.property, request.value).await;
    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct SelectionInputRequest {
    pub text: String,
}

/// Feed input-field text through the rapid-selection machine.
///
/// When the update carries `completed`, the UI follows up with a normal
/// lookup for that text.
pub async fn selection_input(
    State(state): State<AppState>,
    Json(request): Json<SelectionInputRequest>,
) -> Json<SelectionUpdate> {
    Json(state.selector.lock().await.handle_input(&request.text))
}

#[derive(Debug, Deserialize)]
pub struct SelectionKeyRequest {
    pub key: KeyInput,
}

/// Feed a navigation key through the rapid-selection machine
pub async fn selection_key(
    State(state): State<AppState>,
    Json(request): Json<SelectionKeyRequest>,
) -> Json<SelectionUpdate> {
    Json(state.selector.lock().await.handle_key(request.key))
}

#[derive(Debug, Deserialize)]
pub struct SelectionChooseRequest {
    pub index: usize,
}

/// Activate a candidate by index (mouse click)
pub async fn selection_choose(
    State(state): State<AppState>,
    Json(request): Json<SelectionChooseRequest>,
) -> Json<SelectionUpdate> {
    Json(state.selector.lock().await.select_candidate(request.index))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub direct_mode: bool,
    pub translations: Vec<TranslationId>,
    pub surfaces: Vec<SurfaceInfo>,
    pub connected: usize,
}

/// Connection status and loaded translations for the UI header
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        direct_mode: state.direct_mode,
        translations: state.corpus.loaded(),
        surfaces: state.registry.surfaces().await,
        connected: state.registry.connected_count().await,
    })
}

/// Recent lookups, newest first
pub async fn history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.entries().await)
}

async fn stage_or_go_live(state: &AppState, content: ContentItem) {
    if state.direct_mode {
        state.staging.publish_direct(content).await;
    } else {
        state.staging.stage(content).await;
    }
}

fn parse_translations(raw: &[String]) -> Result<Vec<TranslationId>, ApiError> {
    if raw.is_empty() {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "select at least one translation",
        ));
    }
    raw.iter()
        .map(|t| {
            t.parse::<TranslationId>()
                .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        })
        .collect()
}
