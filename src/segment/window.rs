//! Video segment windows
//!
//! The time grid the subtitles are cut to: one window per `#EXTINF` entry of
//! the chosen video playlist.

use std::fmt;

use crate::error::Result;
use crate::playlist::parse_media_segments;

/// A time window matching one video segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentWindow {
    /// 1-based position in the video playlist
    pub index: usize,
    /// Declared duration, truncated to whole seconds
    pub duration_seconds: u64,
    /// Sum of the durations of all earlier windows
    pub cumulative_start_seconds: u64,
    /// Name of the WebVTT file generated for this window
    pub file_name: String,
}

impl SegmentWindow {
    pub fn start_seconds(&self) -> f64 {
        self.cumulative_start_seconds as f64
    }

    pub fn end_seconds(&self) -> f64 {
        (self.cumulative_start_seconds + self.duration_seconds) as f64
    }

    /// Whether a cue starting at `start` belongs to this window.
    ///
    /// Both ends are inclusive, so a cue starting exactly on a boundary
    /// belongs to both adjacent windows.
    pub fn contains(&self, start: f64) -> bool {
        start >= self.start_seconds() && start <= self.end_seconds()
    }
}

impl fmt::Display for SegmentWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}s, {}s] {}",
            self.index,
            self.cumulative_start_seconds,
            self.cumulative_start_seconds + self.duration_seconds,
            self.file_name
        )
    }
}

/// File name of the window with the given index.
pub fn window_file_name(prefix: &str, index: usize) -> String {
    format!("{}{:05}.vtt", prefix, index)
}

/// Build the windows of a video media playlist.
pub fn build_segment_windows(video_text: &str, prefix: &str) -> Result<Vec<SegmentWindow>> {
    let segments = parse_media_segments(video_text)?;

    let mut windows = Vec::with_capacity(segments.len());
    let mut cumulative = 0u64;
    for (i, segment) in segments.iter().enumerate() {
        let index = i + 1;
        let duration_seconds = segment.duration_secs.trunc() as u64;
        windows.push(SegmentWindow {
            index,
            duration_seconds,
            cumulative_start_seconds: cumulative,
            file_name: window_file_name(prefix, index),
        });
        cumulative += duration_seconds;
    }

    tracing::debug!("Segment windows: {:?}", windows);
    Ok(windows)
}
