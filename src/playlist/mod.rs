//! Playlist handling module
//!
//! This module handles the HLS playlists the segmenter reads and writes:
//! - Line tokenizing and attribute-list parsing
//! - Relative reference resolution against storage keys
//! - Master playlist rendition lookup and rewriting
//! - Media playlist parsing and subtitle playlist generation

pub mod master;
pub mod media;
pub mod path;
pub mod tags;

pub use master::{locate_renditions, rewrite_master_manifest, Renditions};
pub use media::{parse_media_segments, rewrite_subtitle_manifest, MediaSegment};
pub use path::PlaylistRef;

/// Content type of HLS playlists.
pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
