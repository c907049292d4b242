//! Subtitle module
//!
//! This module handles the WebVTT side of re-segmentation:
//! - Cue timestamp parsing and formatting
//! - Cue block splitting and repair of split cues
//! - Concatenation of all segments into one cue timeline

pub mod cue;
pub mod timeline;
pub mod timestamp;

pub use cue::Cue;
pub use timeline::Timeline;

/// Content type of WebVTT files.
pub const VTT_CONTENT_TYPE: &str = "text/vtt";
