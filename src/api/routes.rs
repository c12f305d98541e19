use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_size as usize;

    Router::new()
        // Drafts
        .route(
            "/blog/drafts",
            get(handlers::list_drafts).post(handlers::save_draft),
        )
        .route("/blog/drafts/:id", delete(handlers::delete_draft))
        // Published entries
        .route("/blog/posts", axum::routing::post(handlers::release_blog))
        .route(
            "/blog/posts/:id",
            get(handlers::get_blog)
                .put(handlers::modify_blog)
                .delete(handlers::delete_blog),
        )
        // Categories
        .route("/blog/categories", get(handlers::list_categories))
        .route(
            "/blog/categories/:category",
            get(handlers::list_category_entries),
        )
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
