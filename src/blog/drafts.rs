use crate::storage::models::Condition;
use crate::storage::{BLOG_DRAFT, COL_ID, COL_TITLE};

use super::error::{ContentError, ContentResult};
use super::models::DraftEntry;
use super::{draft_key, ContentManager};

impl ContentManager {
    /// Save a draft body, creating the draft when `id` is absent.
    ///
    /// Empty content is ignored and yields `Ok(None)` without touching the
    /// metadata store, the body files or the index; autosave callers send it
    /// routinely. On success returns the draft id.
    pub async fn save_draft(
        &self,
        content: &str,
        title: Option<&str>,
        id: Option<&str>,
    ) -> ContentResult<Option<String>> {
        if content.is_empty() {
            tracing::trace!("Skipping save of empty draft");
            return Ok(None);
        }
        let title = title.filter(|t| !t.is_empty());

        let id = match id.filter(|id| !id.is_empty()) {
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                self.metadata
                    .insert(
                        BLOG_DRAFT,
                        &[COL_ID, COL_TITLE],
                        &[Some(id.clone()), title.map(str::to_string)],
                    )
                    .await
                    .map_err(|e| ContentError::DatabaseWrite(format!("cannot insert draft: {e}")))?;
                id
            }
            Some(id) => {
                if !self.index.read().await.has_draft(id) {
                    return Err(ContentError::param(format!("unknown draft id {id}")));
                }
                self.metadata
                    .update(
                        BLOG_DRAFT,
                        &[COL_TITLE],
                        &[title.map(str::to_string)],
                        &Condition::id(id),
                    )
                    .await
                    .map_err(|e| ContentError::DatabaseWrite(format!("cannot update draft: {e}")))?;
                id.to_string()
            }
        };

        let ticket = self.write_body(&id, &draft_key(&id), content).await?;
        let stored = self.index.write().await.upsert_draft(DraftEntry {
            id: id.clone(),
            title: title.unwrap_or_default().to_string(),
            content: content.to_string(),
        });
        drop(ticket);

        if !stored {
            return Err(ContentError::param(format!("draft {id} has been published")));
        }
        tracing::debug!(entry_id = %id, "Saved draft");
        Ok(Some(id))
    }

    /// Delete a draft: metadata row, then body, then index entry. The id must be
    /// a known draft. A body that is already gone counts as deleted.
    ///
    /// If the body cannot be deleted the row is already gone but the index entry
    /// stays, so the caller can retry.
    pub async fn delete_draft(&self, id: &str) -> ContentResult<()> {
        if id.is_empty() {
            return Err(ContentError::param("id"));
        }
        if !self.index.read().await.has_draft(id) {
            return Err(ContentError::param(format!("unknown draft id {id}")));
        }

        self.metadata
            .delete(BLOG_DRAFT, &Condition::id(id))
            .await
            .map_err(|e| ContentError::DatabaseDelete(format!("cannot delete draft row: {e}")))?;

        self.bodies
            .delete(&draft_key(id))
            .await
            .map_err(|e| ContentError::FileDelete(format!("cannot delete draft body: {e}")))?;

        self.index.write().await.remove_draft(id);
        tracing::debug!(entry_id = %id, "Deleted draft");
        Ok(())
    }
}
