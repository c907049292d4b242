//! Continuous cue timeline
//!
//! Concatenates the cues of every WebVTT segment of a subtitle playlist, in
//! playlist order, into one sequence. Segment cue times are taken as
//! asset-absolute and are not offset per segment.

use super::cue::{parse_segment, Cue};
use crate::error::{Result, SegmenterError};
use crate::playlist::PlaylistRef;
use crate::storage::Storage;

/// Header written when the source segments carry none.
pub const DEFAULT_HEADER: &str = "WEBVTT";

/// The header of the first segment plus all cues in source order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    header: Option<String>,
    cues: Vec<Cue>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and concatenate the given WebVTT segments.
    pub fn build<S: Storage + ?Sized>(
        storage: &S,
        bucket: &str,
        segments: &[PlaylistRef],
    ) -> Result<Self> {
        if segments.is_empty() {
            return Err(SegmenterError::ManifestStructure(
                "subtitle playlist lists no segments".to_string(),
            ));
        }

        let mut timeline = Self::new();
        for segment in segments {
            let text = storage.fetch_text(bucket, &segment.resolved_key).map_err(|e| {
                tracing::error!(
                    "Issue getting vtt file {}/{}: {}",
                    bucket,
                    segment.resolved_key,
                    e
                );
                e
            })?;
            tracing::debug!("VTT file {} body: {:?}", segment.resolved_key, text);

            let added = timeline.push_segment(&text).map_err(|e| {
                tracing::error!("Malformed vtt file {}/{}: {}", bucket, segment.resolved_key, e);
                e
            })?;
            tracing::debug!("Added {} cue(s) from {}", added, segment.resolved_key);
        }

        tracing::info!(
            "Built timeline of {} cue(s) from {} vtt file(s)",
            timeline.len(),
            segments.len()
        );
        Ok(timeline)
    }

    /// Append the cues of one segment. The first segment's header becomes
    /// the timeline header; later headers are discarded.
    pub fn push_segment(&mut self, text: &str) -> Result<usize> {
        let (header, cues) = parse_segment(text)?;
        if self.header.is_none() {
            if let Some(h) = &header {
                if !h.starts_with(DEFAULT_HEADER) {
                    tracing::warn!("First vtt file has an unexpected header: {:?}", h);
                }
            }
            self.header = Some(header.unwrap_or_else(|| DEFAULT_HEADER.to_string()));
        }
        let added = cues.len();
        self.cues.extend(cues);
        Ok(added)
    }

    /// Shared header, prepended to every output file.
    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(DEFAULT_HEADER)
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
