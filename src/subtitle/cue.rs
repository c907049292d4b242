//! WebVTT cue blocks
//!
//! A WebVTT file is a header block followed by cue blocks separated by blank
//! lines. Segmenters upstream of us sometimes emit cue text that itself
//! contains a blank line, which splits one cue into a well-formed block and
//! one or more orphan text blocks. Those orphans are merged back into the
//! cue they belong to.

use super::timestamp::{is_timing_line, parse_timing_line, CueTiming};
use crate::error::{Result, SegmenterError};

/// Separator between blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// A single subtitle cue with its original block text.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Start time in seconds
    pub start_seconds: f64,
    /// End time in seconds
    pub end_seconds: f64,
    /// Block lines: identifier, timing line, text lines
    lines: Vec<String>,
    timing_index: usize,
    timing: CueTiming,
}

impl Cue {
    /// Parse a cue block.
    pub fn parse(block: &str) -> Result<Self> {
        let lines: Vec<String> = block.split('\n').map(str::to_string).collect();
        let timing_index = lines
            .iter()
            .position(|l| is_timing_line(l))
            .ok_or_else(|| {
                SegmenterError::CueFormat(format!("cue block has no timing line: {:?}", block))
            })?;
        let timing = parse_timing_line(&lines[timing_index])?;

        if lines[timing_index + 1..].iter().any(|l| is_timing_line(l)) {
            return Err(SegmenterError::CueFormat(format!(
                "cue text contains a timing arrow: {:?}",
                block
            )));
        }

        Ok(Self {
            start_seconds: timing.start_seconds,
            end_seconds: timing.end_seconds,
            lines,
            timing_index,
            timing,
        })
    }

    /// Cue identifier line, if present.
    pub fn identifier(&self) -> Option<&str> {
        self.lines[..self.timing_index]
            .first()
            .map(String::as_str)
    }

    /// The timing line as written in the source.
    pub fn timing_line(&self) -> &str {
        &self.lines[self.timing_index]
    }

    /// Cue payload: the lines after the timing line.
    pub fn text(&self) -> String {
        self.lines[self.timing_index + 1..].join("\n")
    }

    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// The cue block exactly as parsed.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// The cue block with its timing shifted to be relative to `offset`.
    pub fn render_relative(&self, offset: f64) -> String {
        let mut lines = self.lines.clone();
        lines[self.timing_index] = self.timing.to_line_shifted(offset);
        lines.join("\n")
    }
}

/// Split WebVTT text into blocks.
///
/// Line endings are normalized, blocks are stripped of surrounding newlines
/// and whitespace-only blocks are dropped.
pub fn split_blocks(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split(BLOCK_SEPARATOR)
        .map(|b| b.trim_matches('\n'))
        .filter(|b| !b.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a block starts a new cue rather than continuing the previous one.
///
/// Cue blocks start with a two-digit prefix (numeric identifier or timing
/// line). A block with a non-numeric identifier still counts as a cue when it
/// carries a timing line.
pub fn is_cue_block(block: &str) -> bool {
    let mut chars = block.chars();
    let digits = matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit()
    );
    digits || block.lines().any(is_timing_line)
}

/// Merge continuation blocks into the cue block before them.
///
/// Continuations are re-joined with the blank line they were split on.
/// A continuation with no preceding cue block is dropped.
pub fn repair_blocks(blocks: Vec<String>) -> Vec<String> {
    let mut repaired: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if is_cue_block(&block) {
            repaired.push(block);
        } else if let Some(previous) = repaired.last_mut() {
            tracing::debug!("Merging continuation block into previous cue: {:?}", block);
            previous.push_str(BLOCK_SEPARATOR);
            previous.push_str(&block);
        } else {
            tracing::warn!("Dropping block with no preceding cue: {:?}", block);
        }
    }
    repaired
}

/// Parse one WebVTT segment into its header block and repaired cues.
pub fn parse_segment(text: &str) -> Result<(Option<String>, Vec<Cue>)> {
    let mut blocks = split_blocks(text).into_iter();
    let header = blocks.next();
    let cues = repair_blocks(blocks.collect())
        .iter()
        .map(|b| Cue::parse(b))
        .collect::<Result<Vec<_>>>()?;
    Ok((header, cues))
}
