use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use super::{
    error::ApiError,
    extract::{Editor, VerifiedEditor},
    models::{HealthResponse, MessageResponse, NonceResponse, PageListResponse, PageRef},
    state::AppState,
};
use crate::auth::EDITOR_ACTION;
use crate::editor::{LoadedPage, SaveOutcome, SavePage, SavedPage};
use crate::pages::PageError;
use crate::render;

/// Public page route (GET /custom-page/{name})
///
/// Raw stored bytes with a content type chosen by extension. Failures never
/// describe the filesystem: a miss is a bare 404, anything else a bare 500.
pub async fn serve_page(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match render::render(&state.store, &name).await {
        Ok(page) => {
            state.metrics.page_served();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, page.content_type.to_string())],
                page.body,
            )
                .into_response()
        }
        Err(PageError::NotFound(_)) => {
            state.metrics.serve_miss();
            (StatusCode::NOT_FOUND, "Page not found").into_response()
        }
        Err(err) => {
            warn!(name, error = %err, "Failed to serve page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Issue an anti-forgery nonce for the caller (GET /editor/nonce)
pub async fn issue_nonce(
    State(state): State<AppState>,
    Editor(caller): Editor,
) -> Json<NonceResponse> {
    Json(NonceResponse {
        nonce: state.nonces.issue(&caller.user, EDITOR_ACTION),
        action: EDITOR_ACTION.to_string(),
        expires_in_secs: state.nonces.guaranteed_validity_secs(),
    })
}

/// Create or overwrite a page (POST /editor/pages/save)
///
/// 201 when the file did not exist before, 200 when it was overwritten.
pub async fn save_page(
    State(state): State<AppState>,
    VerifiedEditor(caller): VerifiedEditor,
    payload: Result<Json<SavePage>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedPage>), ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;

    let saved = state.editor.save(request).await?;
    state.metrics.page_saved(saved.outcome);
    info!(user = %caller.user, name = %saved.page_slug, outcome = ?saved.outcome, "Page saved");

    let status = match saved.outcome {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(saved)))
}

/// Read a page by stored file name (POST /editor/pages/load)
pub async fn load_page(
    State(state): State<AppState>,
    VerifiedEditor(_caller): VerifiedEditor,
    payload: Result<Json<PageRef>, JsonRejection>,
) -> Result<Json<LoadedPage>, ApiError> {
    let Json(page) = payload.map_err(json_rejection)?;
    let loaded = state.editor.load(&page.page_slug).await?;
    Ok(Json(loaded))
}

/// Remove a page by stored file name (POST /editor/pages/delete)
pub async fn delete_page(
    State(state): State<AppState>,
    VerifiedEditor(caller): VerifiedEditor,
    payload: Result<Json<PageRef>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(page) = payload.map_err(json_rejection)?;
    state.editor.delete(&page.page_slug).await?;
    state.metrics.page_deleted();
    info!(user = %caller.user, name = %page.page_slug, "Page deleted");

    Ok(Json(MessageResponse {
        message: "Page deleted successfully".to_string(),
    }))
}

/// Every stored page, newest first (GET /editor/pages)
pub async fn list_pages(
    State(state): State<AppState>,
    VerifiedEditor(_caller): VerifiedEditor,
) -> Result<Json<PageListResponse>, ApiError> {
    let pages = state.editor.list().await?;
    Ok(Json(PageListResponse { pages }))
}

/// Health check endpoint (GET /health)
///
/// Reports 503 when the page directory is missing or not a directory.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let storage_ok = tokio::fs::metadata(state.store.root())
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    let mut components = BTreeMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert(
        "storage".to_string(),
        if storage_ok { "healthy" } else { "unhealthy" }.to_string(),
    );

    let (status_code, status) = if storage_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let response = HealthResponse {
        status: status.to_string(),
        components,
        metrics: state.metrics.snapshot(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        ApiError::InvalidPayload(rejection.body_text())
    }
}
