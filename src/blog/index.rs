//! In-memory view of drafts, published entries and the category index.
//!
//! Invariants kept by every mutation:
//! - an id lives in at most one of the draft and published maps;
//! - each published entry appears under exactly the labels in its `category`;
//! - a category key exists only while it has members.
//!
//! The category index holds ids, never copies of entries.

use std::collections::{BTreeMap, HashMap};

use super::models::{CategoryCount, DraftEntry, PublishedEntry};

#[derive(Debug, Default)]
pub struct ContentIndex {
    drafts: BTreeMap<String, DraftEntry>,
    published: HashMap<String, PublishedEntry>,
    /// label -> ids in publish order
    categories: BTreeMap<String, Vec<String>>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Drafts
    // ========================================================================

    /// Insert or replace a draft. Refused (false) when the id is already published.
    pub fn upsert_draft(&mut self, draft: DraftEntry) -> bool {
        if self.published.contains_key(&draft.id) {
            return false;
        }
        self.drafts.insert(draft.id.clone(), draft);
        true
    }

    pub fn remove_draft(&mut self, id: &str) -> Option<DraftEntry> {
        self.drafts.remove(id)
    }

    pub fn draft(&self, id: &str) -> Option<&DraftEntry> {
        self.drafts.get(id)
    }

    pub fn has_draft(&self, id: &str) -> bool {
        self.drafts.contains_key(id)
    }

    pub fn drafts(&self) -> impl Iterator<Item = &DraftEntry> {
        self.drafts.values()
    }

    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    // ========================================================================
    // Published entries
    // ========================================================================

    /// Insert or replace a published entry. A replaced entry leaves its old
    /// categories first. The id stops being a draft.
    pub fn insert_published(&mut self, entry: PublishedEntry) {
        self.remove_published(&entry.id);
        self.drafts.remove(&entry.id);
        self.add_to_categories(&entry.id, &entry.category);
        self.published.insert(entry.id.clone(), entry);
    }

    pub fn remove_published(&mut self, id: &str) -> Option<PublishedEntry> {
        let entry = self.published.remove(id)?;
        self.remove_from_categories(id, &entry.category);
        Some(entry)
    }

    /// Apply a modification to a published entry, moving it between categories
    /// when its labels change. Returns false if the id is not published.
    pub fn update_published(
        &mut self,
        id: &str,
        title: String,
        content: String,
        category: Vec<String>,
    ) -> bool {
        let Some(entry) = self.published.get_mut(id) else {
            return false;
        };
        let old = std::mem::replace(&mut entry.category, category.clone());
        entry.title = title;
        entry.content = content;

        self.remove_from_categories(id, &old);
        self.add_to_categories(id, &category);
        true
    }

    pub fn published(&self, id: &str) -> Option<&PublishedEntry> {
        self.published.get(id)
    }

    pub fn has_published(&self, id: &str) -> bool {
        self.published.contains_key(id)
    }

    pub fn published_count(&self) -> usize {
        self.published.len()
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        self.categories
            .iter()
            .map(|(label, ids)| CategoryCount {
                category: label.clone(),
                num: ids.len(),
            })
            .collect()
    }

    /// Entries under a label in publish order; empty for an unknown label.
    pub fn entries_in_category(&self, label: &str) -> Vec<&PublishedEntry> {
        self.categories
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.published.get(id)).collect())
            .unwrap_or_default()
    }

    fn add_to_categories(&mut self, id: &str, labels: &[String]) {
        for label in labels {
            let ids = self.categories.entry(label.clone()).or_default();
            if !ids.iter().any(|member| member == id) {
                ids.push(id.to_string());
            }
        }
    }

    fn remove_from_categories(&mut self, id: &str, labels: &[String]) {
        for label in labels {
            let now_empty = match self.categories.get_mut(label) {
                Some(ids) => {
                    ids.retain(|member| member != id);
                    ids.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.categories.remove(label);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str, labels: &[&str]) -> PublishedEntry {
        PublishedEntry {
            id: id.to_string(),
            title: format!("title {id}"),
            content: format!("body {id}"),
            category: labels.iter().map(|l| l.to_string()).collect(),
            published_at: Utc::now(),
        }
    }

    fn counts(index: &ContentIndex) -> Vec<(String, usize)> {
        index
            .category_counts()
            .into_iter()
            .map(|c| (c.category, c.num))
            .collect()
    }

    #[test]
    fn test_category_counts_follow_inserts() {
        let mut index = ContentIndex::new();
        index.insert_published(entry("p1", &["a", "b"]));
        index.insert_published(entry("p2", &["a"]));

        assert_eq!(
            counts(&index),
            vec![("a".to_string(), 2), ("b".to_string(), 1)]
        );
        let ids: Vec<&str> = index
            .entries_in_category("a")
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_removing_last_member_drops_category() {
        let mut index = ContentIndex::new();
        index.insert_published(entry("p1", &["a", "solo"]));
        index.insert_published(entry("p2", &["a"]));

        let removed = index.remove_published("p1").expect("p1 was published");
        assert_eq!(removed.id, "p1");
        assert_eq!(counts(&index), vec![("a".to_string(), 1)]);
        assert!(index.entries_in_category("solo").is_empty());
    }

    #[test]
    fn test_republish_does_not_duplicate_membership() {
        let mut index = ContentIndex::new();
        index.insert_published(entry("p1", &["a", "b"]));
        index.insert_published(entry("p1", &["b", "c"]));

        assert_eq!(index.published_count(), 1);
        assert_eq!(
            counts(&index),
            vec![("b".to_string(), 1), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_update_published_moves_categories() {
        let mut index = ContentIndex::new();
        index.insert_published(entry("p1", &["old"]));

        assert!(index.update_published(
            "p1",
            "new title".to_string(),
            "new body".to_string(),
            vec!["new".to_string()],
        ));
        assert_eq!(counts(&index), vec![("new".to_string(), 1)]);
        let p1 = index.published("p1").unwrap();
        assert_eq!(p1.title, "new title");
        assert_eq!(p1.content, "new body");

        assert!(!index.update_published("ghost", String::new(), String::new(), vec![]));
    }

    #[test]
    fn test_publishing_removes_draft() {
        let mut index = ContentIndex::new();
        let draft = DraftEntry {
            id: "d1".to_string(),
            title: String::new(),
            content: "wip".to_string(),
        };
        assert!(index.upsert_draft(draft.clone()));
        index.insert_published(entry("d1", &["a"]));

        assert!(!index.has_draft("d1"));
        assert!(index.has_published("d1"));
        assert!(!index.upsert_draft(draft));
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let index = ContentIndex::new();
        assert!(index.entries_in_category("nothing").is_empty());
        assert!(index.category_counts().is_empty());
    }
}
