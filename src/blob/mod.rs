// Blob storage collaborator: `store(bytes, metadata) -> url`. Upload-bearing
// routes only ever see the trait; the local-disk implementation mirrors the
// statically-served uploads directory of the original deployment.

use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Clone)]
pub struct BlobMetadata {
    pub filename: String,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist the bytes and return a URL the stored blob is reachable at.
    async fn store(&self, bytes: Vec<u8>, meta: BlobMetadata) -> Result<String, StoreError>;
}

pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        Self {
            root,
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, bytes: Vec<u8>, meta: BlobMetadata) -> Result<String, StoreError> {
        let name = format!("{}-{}", Uuid::new_v4(), sanitize(&meta.filename));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Backend(format!("creating upload dir: {}", e)))?;
        tokio::fs::write(self.root.join(&name), &bytes)
            .await
            .map_err(|e| StoreError::Backend(format!("writing blob: {}", e)))?;

        Ok(format!("{}/{}", self.public_base.trim_end_matches('/'), name))
    }
}

/// Keep only path-safe characters so a client-supplied filename can never
/// escape the upload directory.
fn sanitize(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
