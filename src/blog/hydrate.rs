use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::content_store::{ContentStore, ContentStoreError};
use crate::storage::models::{Fields, Order, Row};
use crate::storage::{MetadataStore, BLOG_CONTENT, BLOG_DRAFT, COL_CATEGORY, COL_PUBLISHED_AT, COL_TITLE};

use super::error::{ContentError, ContentResult};
use super::models::{decode_timestamp, split_categories, DraftEntry, PublishedEntry};
use super::{draft_key, post_key, ContentManager};

impl ContentManager {
    /// Build a manager and hydrate its index from the stores.
    ///
    /// Drafts and published entries load concurrently, and so do their bodies.
    /// A row whose body is missing or unreadable is still indexed, with empty
    /// content. Failing to read the metadata tables is an error; callers treat
    /// it as fatal.
    pub async fn open(
        metadata: Arc<dyn MetadataStore>,
        bodies: Arc<dyn ContentStore>,
    ) -> ContentResult<Self> {
        let manager = Self::new(metadata, bodies);
        let (drafts, posts) = tokio::try_join!(manager.load_drafts(), manager.load_posts())?;

        {
            let mut index = manager.index.write().await;
            for draft in drafts {
                index.upsert_draft(draft);
            }
            // Publish order rebuilds each category's member order.
            for post in posts {
                index.insert_published(post);
            }
        }

        let stats = manager.stats().await;
        tracing::info!(
            drafts = stats.drafts,
            published = stats.published,
            categories = stats.categories,
            "Content index hydrated"
        );
        Ok(manager)
    }

    async fn load_drafts(&self) -> ContentResult<Vec<DraftEntry>> {
        let rows = self
            .metadata
            .query(BLOG_DRAFT, Fields::All, None, None)
            .await
            .map_err(|e| ContentError::DatabaseRead(format!("cannot read drafts: {e}")))?;

        let rows = keyed_rows(BLOG_DRAFT, rows);
        let bodies = join_all(
            rows.iter()
                .map(|(id, _)| read_body_or_empty(self.bodies.as_ref(), draft_key(id))),
        )
        .await;

        let drafts = rows
            .into_iter()
            .zip(bodies)
            .map(|((id, row), content)| DraftEntry {
                title: row.get(COL_TITLE).unwrap_or_default().to_string(),
                id,
                content,
            })
            .collect();
        Ok(drafts)
    }

    async fn load_posts(&self) -> ContentResult<Vec<PublishedEntry>> {
        let order = Order::asc(COL_PUBLISHED_AT);
        let rows = self
            .metadata
            .query(BLOG_CONTENT, Fields::All, None, Some(&order))
            .await
            .map_err(|e| ContentError::DatabaseRead(format!("cannot read blogs: {e}")))?;

        let rows = keyed_rows(BLOG_CONTENT, rows);
        let bodies = join_all(
            rows.iter()
                .map(|(id, _)| read_body_or_empty(self.bodies.as_ref(), post_key(id))),
        )
        .await;

        let posts = rows
            .into_iter()
            .zip(bodies)
            .map(|((id, row), content)| {
                let published_at = match row.get(COL_PUBLISHED_AT).and_then(decode_timestamp) {
                    Some(at) => at,
                    None => {
                        tracing::warn!(entry_id = %id, "Unreadable published_at, using epoch");
                        DateTime::<Utc>::default()
                    }
                };
                PublishedEntry {
                    title: row.get(COL_TITLE).unwrap_or_default().to_string(),
                    category: split_categories(row.get(COL_CATEGORY).unwrap_or_default()),
                    id,
                    content,
                    published_at,
                }
            })
            .collect();
        Ok(posts)
    }
}

/// Pair rows with their ids, dropping rows that have none.
fn keyed_rows(table: &str, rows: Vec<Row>) -> Vec<(String, Row)> {
    rows.into_iter()
        .filter_map(|row| {
            let Some(id) = row.id().filter(|id| !id.is_empty()).map(str::to_string) else {
                tracing::warn!(table, "Skipping row without id");
                return None;
            };
            Some((id, row))
        })
        .collect()
}

async fn read_body_or_empty(bodies: &dyn ContentStore, key: String) -> String {
    match bodies.read_full(&key).await {
        Ok(data) => String::from_utf8_lossy(&data).into_owned(),
        Err(ContentStoreError::NotFound(_)) => {
            tracing::warn!(%key, "Body missing, indexing with empty content");
            String::new()
        }
        Err(e) => {
            tracing::warn!(%key, error = %e, "Body unreadable, indexing with empty content");
            String::new()
        }
    }
}
