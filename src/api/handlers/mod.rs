mod admin;
mod categories;
mod drafts;
mod posts;

pub use admin::health;
pub use categories::{list_categories, list_category_entries};
pub use drafts::{delete_draft, list_drafts, save_draft};
pub use posts::{delete_blog, get_blog, modify_blog, release_blog};

use serde::Serialize;

use crate::blog::PublishedEntry;

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub category: Vec<String>,
    pub content: String,
    pub id: String,
    pub published_at: String,
    pub title: String,
}

fn blog_to_response(entry: &PublishedEntry) -> BlogResponse {
    BlogResponse {
        category: entry.category.clone(),
        content: entry.content.clone(),
        id: entry.id.clone(),
        published_at: entry.published_at.to_rfc3339(),
        title: entry.title.clone(),
    }
}
