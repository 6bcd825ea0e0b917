//! Filesystem-backed object store
//!
//! Panel images and generated reports are stored under
//! `{owner_id}/{check_id}/...` keys relative to the configured upload
//! directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::AppError;

/// Abstraction over blob storage for uploaded images
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under the given key, creating parent directories as needed
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), AppError>;

    /// Fetch the bytes stored under a key
    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError>;

    /// Remove the object under a key; missing objects are not an error
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Local filesystem implementation
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        // Keys are slash-joined segments; reject anything that could escape root
        if key.is_empty()
            || key.split('/').any(|seg| {
                seg.is_empty() || seg == "." || seg == ".." || seg.contains(std::path::MAIN_SEPARATOR)
            })
        {
            return Err(AppError::InvalidInput(format!("invalid object key: {key}")));
        }
        Ok(self.root.join(key))
    }

    async fn ensure_parent(path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        Self::ensure_parent(&path).await?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("object {key}")))
            }
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }
}
