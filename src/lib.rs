//! blog-manager - Content backend for a personal blog
//!
//! This crate keeps drafts and published entries consistent across:
//! - Entry metadata rows in a redb-backed, relational-style metadata store
//! - Entry bodies stored as files, one per entry
//! - An in-memory index of drafts, published entries and categories
//! - A REST API over the draft/publish lifecycle

pub mod api;
pub mod blog;
pub mod config;
pub mod content_store;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use blog::ContentManager;
use config::Config;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub blog: ContentManager,
}
