use async_trait::async_trait;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use super::{ContentStore, ContentStoreError};

/// Bodies are written in slices of this size, checking for cancellation in between.
const WRITE_CHUNK: usize = 64 * 1024;

/// Local filesystem content store.
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Create a directory under the store root, e.g. one per body kind.
    pub fn ensure_dir(&self, relative: &str) -> Result<PathBuf, std::io::Error> {
        let dir = self.base_path.join(relative);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

fn write_chunks(
    path: &Path,
    key: &str,
    data: &[u8],
    cancel: &CancellationToken,
) -> Result<(), ContentStoreError> {
    // File::create truncates, so the old body is gone from here on.
    let mut file = std::fs::File::create(path)?;
    for chunk in data.chunks(WRITE_CHUNK) {
        if cancel.is_cancelled() {
            return Err(ContentStoreError::Cancelled(key.to_string()));
        }
        file.write_all(chunk)?;
    }
    file.sync_data()?;
    Ok(())
}

#[async_trait]
impl ContentStore for LocalStore {
    async fn write_full(
        &self,
        key: &str,
        data: Bytes,
        cancel: CancellationToken,
    ) -> Result<(), ContentStoreError> {
        if cancel.is_cancelled() {
            return Err(ContentStoreError::Cancelled(key.to_string()));
        }
        let path = self.object_path(key);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || write_chunks(&path, &key, &data, &cancel))
            .await
            .map_err(|e| ContentStoreError::Backend(format!("write task failed: {e}")))?
    }

    async fn read_full(&self, key: &str) -> Result<Bytes, ContentStoreError> {
        let path = self.object_path(key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ContentStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), ContentStoreError> {
        let path = self.object_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, ContentStoreError> {
        let path = self.object_path(key);
        Ok(tokio::fs::try_exists(&path).await?)
    }
}
