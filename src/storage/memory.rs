//! In-memory storage backend

use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Storage;
use crate::error::{Result, SegmenterError};

/// A stored object with its metadata
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Object store held in memory.
///
/// With a backing store, reads of objects not written to memory fall
/// through to the backing store while writes never reach it.
pub struct MemoryStorage {
    /// Objects (bucket/key -> object)
    objects: DashMap<String, StoredObject>,
    /// Number of put_object calls
    writes: AtomicUsize,
    backing: Option<Box<dyn Storage>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            writes: AtomicUsize::new(0),
            backing: None,
        }
    }

    /// Memory layer on top of `backing`.
    pub fn with_backing(backing: Box<dyn Storage>) -> Self {
        Self {
            backing: Some(backing),
            ..Self::new()
        }
    }

    /// Generate the map key from components
    fn make_key(bucket: &str, key: &str) -> String {
        format!("{}/{}", bucket, key)
    }

    /// Insert an object without counting it as a write.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>, content_type: &str) {
        self.objects.insert(
            Self::make_key(bucket, key),
            StoredObject {
                body: body.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    /// Get an object from the memory layer only.
    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .get(&Self::make_key(bucket, key))
            .map(|r| r.value().clone())
    }

    /// Text of an object in the memory layer.
    pub fn text(&self, bucket: &str, key: &str) -> Option<String> {
        self.get(bucket, key)
            .map(|o| String::from_utf8_lossy(&o.body).into_owned())
    }

    /// All `bucket/key` names in the memory layer, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of writes performed through the `Storage` interface.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Storage for MemoryStorage {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        if let Some(object) = self.objects.get(&Self::make_key(bucket, key)) {
            return Ok(object.body.clone());
        }
        match &self.backing {
            Some(backing) => backing.get_object(bucket, key),
            None => Err(SegmenterError::not_found(bucket, key)),
        }
    }

    fn put_object(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        self.insert(bucket, key, body, content_type);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
