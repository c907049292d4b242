//! Re-segmentation run
//!
//! One run handles one asset: locate the renditions in the master manifest,
//! build the cue timeline, cut it on the video segment grid and write the
//! new subtitle files and manifests. Every output is computed before the
//! first write.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::config::SegmenterConfig;
use crate::error::{Result, SegmenterError};
use crate::event::{ManifestLocation, TriggerEvent};
use crate::playlist::path::replace_file_name;
use crate::playlist::{
    locate_renditions, parse_media_segments, rewrite_master_manifest, rewrite_subtitle_manifest,
    PlaylistRef, PLAYLIST_CONTENT_TYPE,
};
use crate::segment::{build_segment_windows, resegment};
use crate::storage::Storage;
use crate::subtitle::{Timeline, VTT_CONTENT_TYPE};

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub bucket: String,
    /// Number of windows (and VTT files written)
    pub windows: usize,
    /// Number of cues in the timeline
    pub cues: usize,
    /// Keys written, in write order
    pub written: Vec<String>,
    pub subtitle_playlist_key: String,
    pub master_output_key: String,
    pub elapsed: chrono::Duration,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(RunReport),
    /// Nothing to do for this asset
    Skipped { reason: String },
}

impl Outcome {
    /// Human-readable status line.
    pub fn status(&self) -> String {
        self.to_string()
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed(report) => write!(
                f,
                "Done - wrote {} subtitle segment(s) with {} cue(s) to {}/{}, took {:.3} seconds",
                report.windows,
                report.cues,
                report.bucket,
                report.subtitle_playlist_key,
                report.elapsed.num_milliseconds() as f64 / 1000.0
            ),
            Outcome::Skipped { reason } => write!(f, "Skipped - {}", reason),
        }
    }
}

// helper.
fn logged<T>(result: Result<T>, context: impl FnOnce() -> String) -> Result<T> {
    result.map_err(|e| {
        tracing::error!("{}: {}", context(), e);
        e
    })
}

/// Run the segmenter for one trigger event.
pub fn run<S: Storage + ?Sized>(
    event: &TriggerEvent,
    storage: &S,
    config: &SegmenterConfig,
) -> Result<Outcome> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("resegment", run_id = %run_id);
    let _enter = span.enter();

    let started = Utc::now();
    tracing::info!("Event: {:?}", event);

    let location = logged(event.manifest_location(), || "Rejected trigger event".to_string())?;
    tracing::info!("Master manifest: {}", location);

    let master_text = match storage.fetch_text(&location.bucket, &location.key) {
        Ok(text) => text,
        Err(SegmenterError::NotFound { bucket, key }) => {
            tracing::warn!(
                "Master manifest {}/{} does not exist, asset has no HLS output group",
                bucket,
                key
            );
            return Ok(Outcome::Skipped {
                reason: format!("no HLS output group at {}/{}", bucket, key),
            });
        }
        Err(e) => {
            tracing::error!("Issue getting master manifest {}: {}", location, e);
            return Err(e);
        }
    };
    tracing::debug!("Master manifest body: {:?}", master_text);

    let report = resegment_asset(storage, config, &location, &master_text, run_id, started)?;
    tracing::info!("Wrote {} object(s)", report.written.len());

    let outcome = Outcome::Completed(report);
    tracing::info!("{}", outcome);
    Ok(outcome)
}

fn resegment_asset<S: Storage + ?Sized>(
    storage: &S,
    config: &SegmenterConfig,
    location: &ManifestLocation,
    master_text: &str,
    run_id: Uuid,
    started: DateTime<Utc>,
) -> Result<RunReport> {
    let bucket = location.bucket.as_str();

    let renditions = logged(
        locate_renditions(master_text, &location.key, &config.target_codec),
        || format!("Unusable master manifest {}", location),
    )?;
    let subtitles = &renditions.subtitles;
    let video = &renditions.video;

    // Subtitle playlist and its WebVTT segments
    let subtitle_text = logged(storage.fetch_text(bucket, &subtitles.resolved_key), || {
        format!("Issue getting subtitle playlist {}/{}", bucket, subtitles.resolved_key)
    })?;
    let subtitle_segments = logged(parse_media_segments(&subtitle_text), || {
        format!("Unusable subtitle playlist {}/{}", bucket, subtitles.resolved_key)
    })?;
    let segment_refs: Vec<PlaylistRef> = subtitle_segments
        .iter()
        .map(|s| PlaylistRef::resolve(&subtitles.resolved_key, &s.uri))
        .collect();
    tracing::info!(
        "Subtitle playlist lists {} vtt file(s)",
        segment_refs.len()
    );

    let timeline = logged(Timeline::build(storage, bucket, &segment_refs), || {
        format!("Issue building cue timeline from {}/{}", bucket, subtitles.resolved_key)
    })?;

    // Video playlist provides the segment grid
    let video_text = logged(storage.fetch_text(bucket, &video.resolved_key), || {
        format!("Issue getting video playlist {}/{}", bucket, video.resolved_key)
    })?;
    let windows = logged(
        build_segment_windows(&video_text, &config.segment_name_prefix),
        || format!("Unusable video playlist {}/{}", bucket, video.resolved_key),
    )?;
    tracing::info!("Video playlist has {} segment(s)", windows.len());

    let files = resegment(&timeline, &windows, config.relative_timestamps);
    let subtitle_playlist = logged(rewrite_subtitle_manifest(&video_text, &windows), || {
        format!("Issue generating subtitle playlist from {}/{}", bucket, video.resolved_key)
    })?;

    // The new playlist sits next to the old one, so the declared URI keeps
    // its directory and only the file name changes.
    let new_subtitle_uri = replace_file_name(&subtitles.relative_uri, &config.subtitle_playlist_name);
    let new_master = rewrite_master_manifest(master_text, &subtitles.relative_uri, &new_subtitle_uri);

    let subtitle_playlist_key = subtitles.sibling_key(&config.subtitle_playlist_name);
    let master_output_key = location.rewritten_key(&config.master_suffix);

    let mut written = Vec::with_capacity(files.len() + 2);
    let mut write = |key: String, text: &str, content_type: &str| -> Result<()> {
        logged(storage.store_text(bucket, &key, text, content_type), || {
            format!("Issue writing {}/{}", bucket, key)
        })?;
        tracing::info!("Wrote {}/{} ({} bytes)", bucket, key, text.len());
        written.push(key);
        Ok(())
    };

    for file in &files {
        write(subtitles.sibling_key(&file.window.file_name), &file.text, VTT_CONTENT_TYPE)?;
    }
    write(subtitle_playlist_key.clone(), &subtitle_playlist, PLAYLIST_CONTENT_TYPE)?;
    write(master_output_key.clone(), &new_master, PLAYLIST_CONTENT_TYPE)?;

    Ok(RunReport {
        run_id,
        bucket: bucket.to_string(),
        windows: files.len(),
        cues: timeline.len(),
        written,
        subtitle_playlist_key,
        master_output_key,
        elapsed: Utc::now() - started,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_logged_passes_error_through() {
        let err = logged::<()>(
            Err(SegmenterError::ManifestStructure("window count".to_string())),
            || "Issue generating subtitle playlist".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, SegmenterError::ManifestStructure(m) if m == "window count"));
        assert_eq!(logged(Ok(3), || unreachable!()).unwrap(), 3);
    }

    #[test]
    fn test_missing_master_is_skipped() {
        let storage = MemoryStorage::new();
        let event = TriggerEvent::new("s3://media/asset/hls/master.m3u8");
        let outcome = run(&event, &storage, &SegmenterConfig::default()).unwrap();

        assert!(outcome.is_skipped());
        assert!(outcome.status().starts_with("Skipped - no HLS output group"));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_invalid_event() {
        let storage = MemoryStorage::new();
        let err = run(&TriggerEvent::default(), &storage, &SegmenterConfig::default())
            .unwrap_err();
        assert!(matches!(err, SegmenterError::InputValidation(_)));
    }

    #[test]
    fn test_missing_subtitle_playlist_is_fatal() {
        let storage = MemoryStorage::new();
        storage.insert(
            "media",
            "hls/master.m3u8",
            "#EXTM3U\n#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID=\"subs\",NAME=\"en\",URI=\"subs/index.m3u8\"\n#EXT-X-STREAM-INF:BANDWIDTH=1,CODECS=\"avc1.64001f\",SUBTITLES=\"subs\"\nvideo/index.m3u8\n",
            PLAYLIST_CONTENT_TYPE,
        );
        let event = TriggerEvent::new("s3://media/hls/master.m3u8");
        let err = run(&event, &storage, &SegmenterConfig::default()).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(storage.write_count(), 0);
    }
}
