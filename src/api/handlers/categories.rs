use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use super::{blog_to_response, BlogResponse};
use crate::api::response::{AppQuery, JSend, JSendPaginated, Pagination};
use crate::blog::CategoryCount;
use crate::AppState;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesParams {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<JSend<Vec<CategoryCount>>> {
    JSend::success(state.blog.get_category_data().await)
}

pub async fn list_category_entries(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    AppQuery(params): AppQuery<ListEntriesParams>,
) -> Json<JSendPaginated<BlogResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let entries = state.blog.get_entries_by_category(&category).await;
    let total = entries.len() as u64;

    let items = entries
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .map(blog_to_response)
        .collect();

    JSendPaginated::success(
        items,
        Pagination {
            limit,
            offset,
            total,
        },
    )
}
