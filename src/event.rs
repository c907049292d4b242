//! Trigger events
//!
//! A run is started by a JSON event naming the master manifest of an asset:
//!
//! ```json
//! { "hls_manifest": "s3://media-bucket/assets/movie/hls/master.m3u8" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SegmenterError};

/// Extension of HLS playlists.
pub const PLAYLIST_EXTENSION: &str = ".m3u8";

/// The job payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Master manifest URI (`scheme://bucket/key.m3u8`)
    #[serde(default)]
    pub hls_manifest: Option<String>,
}

impl TriggerEvent {
    pub fn new(hls_manifest: impl Into<String>) -> Self {
        Self {
            hls_manifest: Some(hls_manifest.into()),
        }
    }

    /// Parse an event from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| SegmenterError::InputValidation(format!("malformed event JSON: {}", e)))
    }

    /// Validate the event and split its manifest URI.
    pub fn manifest_location(&self) -> Result<ManifestLocation> {
        let uri = self.hls_manifest.as_deref().ok_or_else(|| {
            SegmenterError::InputValidation("missing field \"hls_manifest\"".to_string())
        })?;
        ManifestLocation::parse(uri)
    }
}

/// Bucket and key of a master manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    pub bucket: String,
    pub key: String,
}

impl ManifestLocation {
    /// Parse `scheme://bucket/key`. The key must name an `.m3u8` playlist.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            SegmenterError::InputValidation(format!("{}: {:?}", reason, uri))
        };

        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| invalid("manifest URI has no scheme"))?;
        if scheme.is_empty() {
            return Err(invalid("manifest URI has no scheme"));
        }

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(invalid("manifest URI has no bucket"));
        }
        if key.is_empty() {
            return Err(invalid("manifest URI has no key"));
        }
        if !key.ends_with(PLAYLIST_EXTENSION) {
            return Err(invalid("manifest key is not an .m3u8 playlist"));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Key of the rewritten master manifest: `suffix` inserted before the
    /// playlist extension.
    pub fn rewritten_key(&self, suffix: &str) -> String {
        let stem = self
            .key
            .strip_suffix(PLAYLIST_EXTENSION)
            .unwrap_or(&self.key);
        format!("{}{}{}", stem, suffix, PLAYLIST_EXTENSION)
    }
}

impl fmt::Display for ManifestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
