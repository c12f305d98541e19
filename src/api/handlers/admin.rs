use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::JSend;
use crate::blog::IndexStats;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub index: IndexStats,
    pub status: String,
    pub version: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        index: state.blog.stats().await,
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_state;

    #[tokio::test]
    async fn test_health_reports_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let Json(body) = health(State(state)).await;
        assert_eq!(body.data.status, "ok");
        assert_eq!(
            body.data.index,
            IndexStats {
                drafts: 0,
                published: 0,
                categories: 0,
            }
        );
    }
}
