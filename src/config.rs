//! Segmenter configuration

use serde::{Deserialize, Serialize};

/// Segmenter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Codec prefix of the video rendition whose segments are followed
    pub target_codec: String,

    /// File name of the generated subtitle playlist
    pub subtitle_playlist_name: String,

    /// Prefix of the generated WebVTT files
    pub segment_name_prefix: String,

    /// Inserted before `.m3u8` in the rewritten master manifest's key
    pub master_suffix: String,

    /// Write cue times relative to the start of their window
    pub relative_timestamps: bool,

    /// Root directory of the file system object store
    pub storage_root: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_codec: "avc1".to_string(),
            subtitle_playlist_name: "segmented_vtt.m3u8".to_string(),
            segment_name_prefix: "segmented_vtt_".to_string(),
            master_suffix: "-new".to_string(),
            relative_timestamps: false,
            storage_root: ".".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl SegmenterConfig {
    /// Whether logs are written as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Default tracing filter directive
    pub fn log_filter(&self) -> String {
        format!("hls_vtt_segmenter={}", self.log_level)
    }
}
