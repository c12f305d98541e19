use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{blog_to_response, BlogResponse};
use crate::api::response::{ApiError, AppJson, JSend};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct ReleaseBlogRequest {
    pub category: Vec<String>,
    pub content: String,
    /// Id of the draft being published, if any
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ReleaseBlogResponse {
    pub id: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ModifyBlogRequest {
    #[serde(default)]
    pub category: Option<Vec<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn release_blog(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ReleaseBlogRequest>,
) -> Result<Json<JSend<ReleaseBlogResponse>>, ApiError> {
    let id = state
        .blog
        .release_blog(&req.title, &req.content, &req.category, req.id.as_deref())
        .await?;

    Ok(JSend::success(ReleaseBlogResponse { id }))
}

pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<BlogResponse>>, ApiError> {
    let entry = state
        .blog
        .get_blog(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;

    Ok(JSend::success(blog_to_response(&entry)))
}

pub async fn modify_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ModifyBlogRequest>,
) -> Result<Json<JSend<BlogResponse>>, ApiError> {
    // Validate at least one field is provided
    if req.title.is_none() && req.content.is_none() && req.category.is_none() {
        return Err(ApiError::bad_request(
            "at least one field (title, content, category) must be provided",
        ));
    }

    if !state.blog.has_blog(&id).await {
        return Err(ApiError::not_found("Blog not found"));
    }

    state
        .blog
        .modify_blog(
            &id,
            req.title.as_deref(),
            req.content.as_deref(),
            req.category.as_deref(),
        )
        .await?;

    let entry = state
        .blog
        .get_blog(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;

    Ok(JSend::success(blog_to_response(&entry)))
}

pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    if !state.blog.has_blog(&id).await {
        return Err(ApiError::not_found("Blog not found"));
    }

    state.blog.delete_blog(&id).await?;
    Ok(JSend::success(()))
}
