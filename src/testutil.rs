//! Shared test helpers for handler tests.

use std::sync::Arc;

use crate::blog::{self, ContentManager};
use crate::config::{Config, NodeConfig, StorageConfig};
use crate::content_store::LocalStore;
use crate::storage::Database;
use crate::AppState;

/// Create a test AppState with a temporary database and content root.
pub async fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let content_root = temp_dir.path().join("blog");

    let config = Config {
        node: NodeConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
        },
        storage: StorageConfig {
            content_root: content_root.to_string_lossy().to_string(),
        },
        max_body_size: 10 * 1024 * 1024, // 10MB for tests
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    let store = LocalStore::new(&content_root).expect("Failed to create test content store");
    blog::prepare_layout(&store).expect("Failed to create body directories");

    let manager = ContentManager::open(Arc::new(db), Arc::new(store))
        .await
        .expect("Failed to load content index");

    Arc::new(AppState {
        config,
        blog: manager,
    })
}
