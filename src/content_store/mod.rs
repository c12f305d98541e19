mod local;

pub use local::LocalStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Body not found: {0}")]
    NotFound(String),
    #[error("Write to {0} was cancelled")]
    Cancelled(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Filesystem-like storage for entry bodies.
/// Keys are relative paths such as `draft/<id>.md`; bodies are meaningless without the metadata rows.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Replace the whole body at `key`. The previous contents are gone as soon as
    /// the write starts. Once `cancel` fires the write stops where it is and the
    /// body is left partially written.
    async fn write_full(
        &self,
        key: &str,
        data: Bytes,
        cancel: CancellationToken,
    ) -> Result<(), ContentStoreError>;
    async fn read_full(&self, key: &str) -> Result<Bytes, ContentStoreError>;
    async fn delete(&self, key: &str) -> Result<(), ContentStoreError>;
    async fn exists(&self, key: &str) -> Result<bool, ContentStoreError>;
}
