use thiserror::Error;

/// Main error type for the segmenter
#[derive(Error, Debug)]
pub enum SegmenterError {
    /// The trigger event is missing a field or carries a malformed URI
    #[error("Invalid trigger event: {0}")]
    InputValidation(String),

    /// An expected manifest tag or attribute is absent
    #[error("Manifest structure error: {0}")]
    ManifestStructure(String),

    /// A cue block has no usable timing line
    #[error("Cue format error: {0}")]
    CueFormat(String),

    /// A storage read or write failed
    #[error("Storage IO error on {bucket}/{key}: {source}")]
    Io {
        bucket: String,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A referenced object does not exist
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Configuration could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SegmenterError {
    /// Build an `Io` error for the given object.
    pub fn io(bucket: &str, key: &str, source: std::io::Error) -> Self {
        SegmenterError::Io {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        }
    }

    /// Build a `NotFound` error for the given object.
    pub fn not_found(bucket: &str, key: &str) -> Self {
        SegmenterError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SegmenterError::NotFound { .. })
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SegmenterError>;
