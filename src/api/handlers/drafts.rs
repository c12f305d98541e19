use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, AppQuery, JSend};
use crate::blog::DraftEntry;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct SaveDraftRequest {
    pub content: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveDraftResponse {
    /// `None` when the content was empty and nothing was saved
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListDraftsParams {
    #[serde(default)]
    pub id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_drafts(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListDraftsParams>,
) -> Json<JSend<Vec<DraftEntry>>> {
    let drafts = state.blog.get_draft_content(params.id.as_deref()).await;
    JSend::success(drafts)
}

pub async fn save_draft(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SaveDraftRequest>,
) -> Result<Json<JSend<SaveDraftResponse>>, ApiError> {
    let id = state
        .blog
        .save_draft(&req.content, req.title.as_deref(), req.id.as_deref())
        .await?;

    Ok(JSend::success(SaveDraftResponse { id }))
}

pub async fn delete_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    if !state.blog.has_draft(&id).await {
        return Err(ApiError::not_found("Draft not found"));
    }

    state.blog.delete_draft(&id).await?;
    Ok(JSend::success(()))
}
