//! Content persistence and indexing engine.
//!
//! A [`ContentManager`] keeps four things in step: metadata rows in the
//! [`MetadataStore`], entry bodies in the [`ContentStore`], the in-memory
//! [`ContentIndex`], and the [`WriteRegistry`] that allows one live body write
//! per entry id.
//!
//! Rows and bodies are not written atomically together. A failure between the
//! two leaves an orphaned row or body behind, and hydration tolerates both.

mod drafts;
pub mod error;
mod hydrate;
pub mod index;
pub mod models;
mod posts;
pub mod registry;

pub use error::{ContentError, ContentResult, ErrorKind};
pub use models::{CategoryCount, DraftEntry, PublishedEntry};

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio_util::task::TaskTracker;

use crate::content_store::{ContentStore, LocalStore};
use crate::storage::MetadataStore;
use index::ContentIndex;
use registry::{WriteOutcome, WriteRegistry, WriteTicket};

/// Directory (under the content root) holding draft bodies.
pub const DRAFT_DIR: &str = "draft";
/// Directory (under the content root) holding published bodies.
pub const POST_DIR: &str = "content";
const BODY_EXT: &str = "md";

pub fn draft_key(id: &str) -> String {
    format!("{DRAFT_DIR}/{id}.{BODY_EXT}")
}

pub fn post_key(id: &str) -> String {
    format!("{POST_DIR}/{id}.{BODY_EXT}")
}

/// Create the draft and published body directories.
pub fn prepare_layout(store: &LocalStore) -> ContentResult<()> {
    for dir in [DRAFT_DIR, POST_DIR] {
        store.ensure_dir(dir).map_err(|e| {
            ContentError::CreateFile(format!(
                "cannot create {}: {e}",
                store.base_path().join(dir).display()
            ))
        })?;
    }
    Ok(())
}

/// Sizes of the in-memory index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct IndexStats {
    pub drafts: usize,
    pub published: usize,
    pub categories: usize,
}

pub struct ContentManager {
    metadata: Arc<dyn MetadataStore>,
    bodies: Arc<dyn ContentStore>,
    registry: WriteRegistry,
    index: RwLock<ContentIndex>,
    background: TaskTracker,
}

impl ContentManager {
    fn new(metadata: Arc<dyn MetadataStore>, bodies: Arc<dyn ContentStore>) -> Self {
        Self {
            registry: WriteRegistry::new(Arc::clone(&bodies)),
            metadata,
            bodies,
            index: RwLock::new(ContentIndex::new()),
            background: TaskTracker::new(),
        }
    }

    /// Write a body through the registry. Superseded writes count as failures.
    async fn write_body(&self, id: &str, key: &str, content: &str) -> ContentResult<WriteTicket> {
        let data = Bytes::copy_from_slice(content.as_bytes());
        match self.registry.begin_write(id, key, data).await {
            Ok(WriteOutcome::Completed(ticket)) => Ok(ticket),
            Ok(WriteOutcome::Superseded) => Err(ContentError::FileWrite(format!(
                "write to {key} was superseded by a newer write"
            ))),
            Err(e) => {
                tracing::warn!(entry_id = %id, key, error = %e, "Body write failed");
                Err(ContentError::FileWrite(format!("cannot write {key}: {e}")))
            }
        }
    }

    /// Wait for detached background work (draft cleanup after publish) to finish.
    pub async fn drain_background(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }

    pub async fn stats(&self) -> IndexStats {
        let index = self.index.read().await;
        IndexStats {
            drafts: index.draft_count(),
            published: index.published_count(),
            categories: index.category_counts().len(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// One draft when `id` is given (empty if unknown), otherwise every draft.
    pub async fn get_draft_content(&self, id: Option<&str>) -> Vec<DraftEntry> {
        let index = self.index.read().await;
        match id {
            Some(id) => index.draft(id).cloned().into_iter().collect(),
            None => index.drafts().cloned().collect(),
        }
    }

    pub async fn has_draft(&self, id: &str) -> bool {
        self.index.read().await.has_draft(id)
    }

    pub async fn has_blog(&self, id: &str) -> bool {
        self.index.read().await.has_published(id)
    }

    pub async fn get_blog(&self, id: &str) -> Option<PublishedEntry> {
        self.index.read().await.published(id).cloned()
    }

    /// Member count per category label.
    pub async fn get_category_data(&self) -> Vec<CategoryCount> {
        self.index.read().await.category_counts()
    }

    /// Entries under `category` in publish order. Unknown labels yield nothing.
    pub async fn get_entries_by_category(&self, category: &str) -> Vec<PublishedEntry> {
        self.index
            .read()
            .await
            .entries_in_category(category)
            .into_iter()
            .cloned()
            .collect()
    }
}
