//! End-to-end scenarios
//!
//! Each scenario runs the whole pipeline against an in-memory asset and
//! checks the objects it leaves behind.

use super::fixtures::{TestAsset, BUCKET};
use super::validation::{validate_media_playlist, validate_webvtt, ValidationResult};
use crate::config::SegmenterConfig;
use crate::error::SegmenterError;
use crate::event::TriggerEvent;
use crate::pipeline::{run, Outcome, RunReport};
use crate::storage::MemoryStorage;

fn run_asset(asset: &TestAsset, config: &SegmenterConfig) -> (MemoryStorage, RunReport) {
    let storage = asset.storage();
    let event = TriggerEvent::new(asset.manifest_uri());
    match run(&event, &storage, config) {
        Ok(Outcome::Completed(report)) => (storage, report),
        Ok(other) => panic!("{}: unexpected outcome {}", asset.name, other),
        Err(e) => panic!("{}: run failed: {}", asset.name, e),
    }
}

fn text(storage: &MemoryStorage, key: &str) -> String {
    storage
        .text(BUCKET, key)
        .unwrap_or_else(|| panic!("missing output {}", key))
}

/// Two subtitle segments re-cut onto two 10 second video segments
pub fn test_two_segment_asset() -> ValidationResult {
    let asset = TestAsset::two_segments();
    let (storage, report) = run_asset(&asset, &SegmenterConfig::default());

    if report.windows != 2 || report.cues != 4 {
        return ValidationResult::fail(format!(
            "expected 2 windows and 4 cues, got {} and {}",
            report.windows, report.cues
        ));
    }

    let expected_keys = [
        "movie/hls/segmented_vtt_00001.vtt",
        "movie/hls/segmented_vtt_00002.vtt",
        "movie/hls/segmented_vtt.m3u8",
        "movie/hls/movie-new.m3u8",
    ];
    if report.written != expected_keys {
        return ValidationResult::fail(format!("unexpected writes: {:?}", report.written));
    }

    for key in &expected_keys[..2] {
        let result = validate_webvtt(&text(&storage, key));
        if !result.is_valid {
            return result;
        }
    }

    let first = text(&storage, expected_keys[0]);
    let second = text(&storage, expected_keys[1]);
    if !first.starts_with("WEBVTT\nX-TIMESTAMP-MAP=MPEGTS:900000,LOCAL:00:00:00.000\n\n1\n") {
        return ValidationResult::fail(format!("bad header in first file: {:?}", first));
    }
    if first.matches("-->").count() != 3 || second.matches("-->").count() != 2 {
        return ValidationResult::fail("cues not distributed over the windows".to_string());
    }
    if !first.contains("On the boundary") || !second.contains("On the boundary") {
        return ValidationResult::fail("boundary cue must be in both windows".to_string());
    }

    let playlist = text(&storage, expected_keys[2]);
    let result = validate_media_playlist(&playlist);
    if !result.is_valid {
        return result;
    }
    if !playlist.contains("#EXTINF:10.000,\nsegmented_vtt_00001.vtt\n#EXTINF:10.000,\nsegmented_vtt_00002.vtt\n")
    {
        return ValidationResult::fail(format!("unexpected subtitle playlist: {}", playlist));
    }

    let master = text(&storage, expected_keys[3]);
    if !master.contains("URI=\"segmented_vtt.m3u8\"") || master.contains("movie_subs.m3u8") {
        return ValidationResult::fail(format!("master not rewritten: {}", master));
    }
    if master.replace("segmented_vtt.m3u8", "movie_subs.m3u8") != asset.master {
        return ValidationResult::fail("master rewrite touched other lines".to_string());
    }

    ValidationResult::success()
}

/// Renditions in subdirectories with `../` segment references
pub fn test_nested_layout() -> ValidationResult {
    let asset = TestAsset::nested_layout();
    let (storage, report) = run_asset(&asset, &SegmenterConfig::default());

    if report.subtitle_playlist_key != "assets/movie/hls/subs/segmented_vtt.m3u8" {
        return ValidationResult::fail(format!(
            "subtitle playlist written to {}",
            report.subtitle_playlist_key
        ));
    }
    if report.master_output_key != "assets/movie/hls/master-new.m3u8" {
        return ValidationResult::fail(format!(
            "master written to {}",
            report.master_output_key
        ));
    }

    let first = text(&storage, "assets/movie/hls/subs/segmented_vtt_00001.vtt");
    if first != "WEBVTT\n\n1\n00:00:00.500 --> 00:00:02.000\nFirst line\n\nsecond paragraph\n\n" {
        return ValidationResult::fail(format!("split cue not repaired: {:?}", first));
    }

    let second = text(&storage, "assets/movie/hls/subs/segmented_vtt_00002.vtt");
    if !second.contains("00:00:04.250 --> 00:00:05.000 align:start") || !second.contains("Next") {
        return ValidationResult::fail(format!("unexpected second file: {:?}", second));
    }

    let third = text(&storage, "assets/movie/hls/subs/segmented_vtt_00003.vtt");
    if third != "WEBVTT\n\n" {
        return ValidationResult::fail(format!("empty window not header-only: {:?}", third));
    }

    let master = text(&storage, &report.master_output_key);
    if !master.contains("URI=\"subs/segmented_vtt.m3u8\"\r\n") {
        return ValidationResult::fail(format!("master not rewritten: {:?}", master));
    }

    ValidationResult::success()
}

/// Cue times relative to the window start
pub fn test_relative_timestamps() -> ValidationResult {
    let config = SegmenterConfig {
        relative_timestamps: true,
        ..SegmenterConfig::default()
    };
    let (storage, _) = run_asset(&TestAsset::two_segments(), &config);

    let second = text(&storage, "movie/hls/segmented_vtt_00002.vtt");
    if !second.contains("00:00:00.000 --> 00:00:01.000\nOn the boundary")
        || !second.contains("00:00:02.000 --> 00:00:04.000\nSecond segment")
    {
        return ValidationResult::fail(format!("times not relative: {:?}", second));
    }
    ValidationResult::success()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_segment_asset_e2e() {
        let result = test_two_segment_asset();
        assert!(result.is_valid, "Two segment asset failed: {:?}", result.errors);
    }

    #[test]
    fn test_nested_layout_e2e() {
        let result = test_nested_layout();
        assert!(result.is_valid, "Nested layout failed: {:?}", result.errors);
    }

    #[test]
    fn test_relative_timestamps_e2e() {
        let result = test_relative_timestamps();
        assert!(result.is_valid, "Relative timestamps failed: {:?}", result.errors);
    }

    #[test]
    fn test_missing_subtitle_declaration() {
        let asset = TestAsset::without_subtitles();
        let storage = asset.storage();
        let event = TriggerEvent::new(asset.manifest_uri());

        let err = run(&event, &storage, &SegmenterConfig::default()).unwrap_err();
        assert!(matches!(err, SegmenterError::ManifestStructure(_)));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_missing_vtt_segment_is_fatal() {
        let asset = TestAsset::two_segments();
        let storage = MemoryStorage::new();
        storage.insert(BUCKET, asset.master_key, asset.master.clone(), "application/vnd.apple.mpegurl");
        for (key, body) in asset.objects.iter().filter(|(k, _)| !k.ends_with("00002.vtt")) {
            storage.insert(BUCKET, key, body.clone(), "text/vtt");
        }

        let err = run(&TriggerEvent::new(asset.manifest_uri()), &storage, &SegmenterConfig::default())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_rerun_overwrites_outputs() {
        let asset = TestAsset::two_segments();
        let storage = asset.storage();
        let event = TriggerEvent::new(asset.manifest_uri());
        let config = SegmenterConfig::default();

        run(&event, &storage, &config).unwrap();
        let first_master = storage.text(BUCKET, "movie/hls/movie-new.m3u8");
        run(&event, &storage, &config).unwrap();

        assert_eq!(storage.write_count(), 8);
        assert_eq!(storage.text(BUCKET, "movie/hls/movie-new.m3u8"), first_master);
    }

    #[test]
    fn test_other_codec() {
        let config = SegmenterConfig {
            target_codec: "hvc1".to_string(),
            ..SegmenterConfig::default()
        };
        let (_, report) = run_asset(&TestAsset::two_segments(), &config);
        assert_eq!(report.windows, 3);
    }
}
