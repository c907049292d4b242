//! Media playlist handling
//!
//! Parses the `#EXTINF` entries of a media playlist and produces the
//! re-segmented subtitle playlist from the video playlist's layout.

use super::tags::{tokenize, LineKind};
use crate::error::{Result, SegmenterError};
use crate::segment::SegmentWindow;

/// One `#EXTINF` entry of a media playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSegment {
    /// Declared duration in seconds.
    pub duration_secs: f64,
    /// Optional title after the comma.
    pub title: Option<String>,
    /// Segment URI, relative to the playlist.
    pub uri: String,
}

/// Parse the duration part of an `#EXTINF` value (`<duration>,[title]`).
pub fn parse_extinf(value: &str) -> Result<(f64, Option<String>)> {
    let (duration, title) = match value.split_once(',') {
        Some((d, t)) => (d, Some(t.trim()).filter(|t| !t.is_empty())),
        None => (value, None),
    };
    let duration_secs = duration.trim().parse::<f64>().map_err(|_| {
        SegmenterError::ManifestStructure(format!("invalid #EXTINF duration: {:?}", duration))
    })?;
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(SegmenterError::ManifestStructure(format!(
            "invalid #EXTINF duration: {:?}",
            duration
        )));
    }
    Ok((duration_secs, title.map(str::to_string)))
}

/// Parse all segments of a media playlist, in playlist order.
pub fn parse_media_segments(text: &str) -> Result<Vec<MediaSegment>> {
    let mut segments = Vec::new();
    let mut pending: Option<(f64, Option<String>)> = None;

    for line in tokenize(text) {
        match line.kind {
            LineKind::Tag { name: "EXTINF", value } => {
                if pending.is_some() {
                    return Err(SegmenterError::ManifestStructure(
                        "#EXTINF entry without segment URI".to_string(),
                    ));
                }
                pending = Some(parse_extinf(value.unwrap_or(""))?);
            }
            LineKind::Uri(uri) => {
                if let Some((duration_secs, title)) = pending.take() {
                    segments.push(MediaSegment {
                        duration_secs,
                        title,
                        uri: uri.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    if pending.is_some() {
        return Err(SegmenterError::ManifestStructure(
            "trailing #EXTINF entry without segment URI".to_string(),
        ));
    }

    Ok(segments)
}

/// Generate the subtitle playlist: a copy of the video playlist in which the
/// URI of the n-th `#EXTINF` entry is replaced by the n-th window's file.
///
/// All other lines, including tags and their line terminators, are copied
/// verbatim.
pub fn rewrite_subtitle_manifest(video_text: &str, windows: &[SegmentWindow]) -> Result<String> {
    let mut output = Vec::new();
    let mut windows_iter = windows.iter();
    let mut after_extinf = false;

    for line in tokenize(video_text) {
        match line.kind {
            LineKind::Tag { name: "EXTINF", .. } => {
                after_extinf = true;
                output.push(line.raw.to_string());
            }
            LineKind::Uri(_) if after_extinf => {
                after_extinf = false;
                let window = windows_iter.next().ok_or_else(|| {
                    SegmenterError::ManifestStructure(format!(
                        "video playlist has more segments than the {} windows",
                        windows.len()
                    ))
                })?;
                let terminator = if line.raw.ends_with('\r') { "\r" } else { "" };
                output.push(format!("{}{}", window.file_name, terminator));
            }
            _ => output.push(line.raw.to_string()),
        }
    }

    let unused = windows_iter.count();
    if unused > 0 {
        return Err(SegmenterError::ManifestStructure(format!(
            "{} window(s) have no matching segment in the video playlist",
            unused
        )));
    }

    Ok(output.join("\n"))
}
