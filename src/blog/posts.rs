use std::sync::Arc;

use chrono::Utc;

use crate::storage::models::Condition;
use crate::storage::{BLOG_CONTENT, BLOG_DRAFT, COL_CATEGORY, COL_ID, COL_PUBLISHED_AT, COL_TITLE};

use super::error::{ContentError, ContentResult};
use super::models::{encode_timestamp, join_categories, normalize_categories, PublishedEntry};
use super::{draft_key, post_key, ContentManager};

impl ContentManager {
    /// Publish an entry. Passing the id of a draft turns that draft into the
    /// published entry; its draft row and body are removed in the background.
    pub async fn release_blog(
        &self,
        title: &str,
        content: &str,
        category: &[String],
        id: Option<&str>,
    ) -> ContentResult<String> {
        let category = normalize_categories(category);
        if title.is_empty() {
            return Err(ContentError::param("title"));
        }
        if content.is_empty() {
            return Err(ContentError::param("content"));
        }
        if category.is_empty() {
            return Err(ContentError::param("category"));
        }

        let id = id
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let published_at = Utc::now();

        self.metadata
            .insert(
                BLOG_CONTENT,
                &[COL_ID, COL_TITLE, COL_CATEGORY, COL_PUBLISHED_AT],
                &[
                    Some(id.clone()),
                    Some(title.to_string()),
                    Some(join_categories(&category)),
                    Some(encode_timestamp(&published_at)),
                ],
            )
            .await
            .map_err(|e| ContentError::DatabaseWrite(format!("cannot insert blog: {e}")))?;

        let ticket = self.write_body(&id, &post_key(&id), content).await?;
        self.index.write().await.insert_published(PublishedEntry {
            id: id.clone(),
            title: title.to_string(),
            content: content.to_string(),
            category,
            published_at,
        });
        drop(ticket);

        self.spawn_draft_cleanup(&id);
        tracing::debug!(entry_id = %id, "Published blog");
        Ok(id)
    }

    /// Change a published entry's title, body and/or categories. Blank values keep
    /// the current ones.
    ///
    /// The metadata row is always updated. The body and the index are only
    /// refreshed when new content is given; a title or category change without
    /// content reaches the row but leaves the index as it was.
    pub async fn modify_blog(
        &self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
        category: Option<&[String]>,
    ) -> ContentResult<()> {
        if id.is_empty() {
            return Err(ContentError::param("id"));
        }
        let current = self
            .index
            .read()
            .await
            .published(id)
            .cloned()
            .ok_or_else(|| ContentError::param(format!("unknown blog id {id}")))?;

        let next_title = title
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or(current.title);
        let next_category = category
            .map(normalize_categories)
            .filter(|c| !c.is_empty())
            .unwrap_or(current.category);

        self.metadata
            .update(
                BLOG_CONTENT,
                &[COL_TITLE, COL_CATEGORY],
                &[
                    Some(next_title.clone()),
                    Some(join_categories(&next_category)),
                ],
                &Condition::id(id),
            )
            .await
            .map_err(|e| ContentError::DatabaseWrite(format!("cannot update blog: {e}")))?;

        let Some(content) = content.filter(|c| !c.is_empty()) else {
            tracing::debug!(entry_id = %id, "Updated blog metadata only");
            return Ok(());
        };

        let ticket = self.write_body(id, &post_key(id), content).await?;
        let found = self.index.write().await.update_published(
            id,
            next_title,
            content.to_string(),
            next_category,
        );
        drop(ticket);

        if !found {
            // Deleted while the body was being written.
            return Err(ContentError::param(format!("unknown blog id {id}")));
        }
        tracing::debug!(entry_id = %id, "Modified blog");
        Ok(())
    }

    /// Delete a published entry: metadata row, then body. The entry only leaves
    /// the index once its body is gone.
    pub async fn delete_blog(&self, id: &str) -> ContentResult<()> {
        if id.is_empty() {
            return Err(ContentError::param("id"));
        }

        self.metadata
            .delete(BLOG_CONTENT, &Condition::id(id))
            .await
            .map_err(|e| ContentError::DatabaseDelete(format!("cannot delete blog row: {e}")))?;

        self.bodies
            .delete(&post_key(id))
            .await
            .map_err(|e| ContentError::FileDelete(format!("cannot delete blog body: {e}")))?;

        self.index.write().await.remove_published(id);
        tracing::debug!(entry_id = %id, "Deleted blog");
        Ok(())
    }

    /// Remove a published id's draft row and body without waiting. Failures are
    /// logged and never reach the publisher.
    fn spawn_draft_cleanup(&self, id: &str) {
        let metadata = Arc::clone(&self.metadata);
        let bodies = Arc::clone(&self.bodies);
        let id = id.to_string();

        self.background.spawn(async move {
            if let Err(e) = metadata.delete(BLOG_DRAFT, &Condition::id(&id)).await {
                tracing::warn!(entry_id = %id, error = %e, "Failed to delete draft row after publish");
            }
            if let Err(e) = bodies.delete(&draft_key(&id)).await {
                tracing::warn!(entry_id = %id, error = %e, "Failed to delete draft body after publish");
            }
        });
    }
}
