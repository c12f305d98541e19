pub mod db;
pub mod metadata;
pub mod models;
mod rows;
mod tables;

pub use db::{Database, DatabaseError};
pub use metadata::MetadataStore;
pub use tables::*;
