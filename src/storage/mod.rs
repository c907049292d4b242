//! Object storage
//!
//! The segmenter reads and writes whole objects addressed by bucket and key.
//! Backends:
//! - `FsStorage`: a directory per bucket under a local root
//! - `MemoryStorage`: in-memory objects, optionally reading through to
//!   another backend

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use bytes::Bytes;

use crate::error::{Result, SegmenterError};

/// Whole-object storage addressed by bucket and key.
pub trait Storage: Send + Sync {
    /// Read an object. Fails with `NotFound` when it does not exist.
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Create or overwrite an object.
    fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()>;

    /// Read an object as UTF-8 text.
    fn fetch_text(&self, bucket: &str, key: &str) -> Result<String> {
        let body = self.get_object(bucket, key)?;
        String::from_utf8(body.to_vec()).map_err(|e| {
            SegmenterError::io(
                bucket,
                key,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Write a text object.
    fn store_text(&self, bucket: &str, key: &str, text: &str, content_type: &str) -> Result<()> {
        self.put_object(bucket, key, Bytes::copy_from_slice(text.as_bytes()), content_type)
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        (**self).get_object(bucket, key)
    }

    fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        (**self).put_object(bucket, key, body, content_type)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        (**self).get_object(bucket, key)
    }

    fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        (**self).put_object(bucket, key, body, content_type)
    }
}
