//! File system storage backend
//!
//! Bucket `b`, key `k` maps to `<root>/b/k`.

use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

use super::Storage;
use crate::error::{Result, SegmenterError};

/// Storage backed by a local directory tree.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a storage rooted at `root`. The directory is not created.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map bucket and key to a path below the root.
    ///
    /// Keys that would escape the bucket directory are rejected.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let invalid = |reason: &str| {
            SegmenterError::io(
                bucket,
                key,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, reason.to_string()),
            )
        };

        if bucket.is_empty() || bucket.contains('/') || bucket == "." || bucket == ".." {
            return Err(invalid("invalid bucket name"));
        }

        let key_path = Path::new(key);
        if key.is_empty()
            || key_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(invalid("key must be a relative path without '..'"));
        }

        Ok(self.root.join(bucket).join(key_path))
    }
}

impl Storage for FsStorage {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let path = self.object_path(bucket, key)?;
        match std::fs::read(&path) {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SegmenterError::not_found(bucket, key))
            }
            Err(e) => Err(SegmenterError::io(bucket, key, e)),
        }
    }

    fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SegmenterError::io(bucket, key, e))?;
        }
        std::fs::write(&path, &body).map_err(|e| SegmenterError::io(bucket, key, e))?;
        tracing::debug!(
            "Wrote {} bytes ({}) to {}",
            body.len(),
            content_type,
            path.display()
        );
        Ok(())
    }
}
