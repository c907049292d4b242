//! Master playlist handling
//!
//! Locates the subtitle and video renditions referenced by a master
//! playlist, and rewrites the master playlist to point at the re-segmented
//! subtitle playlist.

use super::path::PlaylistRef;
use super::tags::{tokenize, AttributeList, Line, LineKind};
use crate::error::{Result, SegmenterError};

/// The two renditions the segmenter works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renditions {
    /// Subtitle (WebVTT) media playlist.
    pub subtitles: PlaylistRef,
    /// Video media playlist providing the segment grid.
    pub video: PlaylistRef,
}

/// Locate the subtitle playlist and the first video rendition whose codec
/// matches `target_codec`, both resolved against `master_key`.
pub fn locate_renditions(master_text: &str, master_key: &str, target_codec: &str) -> Result<Renditions> {
    let lines = tokenize(master_text);

    let subtitle_uri = find_subtitle_uri(&lines)?;
    let subtitles = PlaylistRef::resolve(master_key, &subtitle_uri);
    tracing::info!("Subtitle playlist: {}", subtitles);

    let video_uri = find_video_uri(&lines, target_codec)?;
    let video = PlaylistRef::resolve(master_key, video_uri);
    tracing::info!("Video playlist ({}): {}", target_codec, video);

    Ok(Renditions { subtitles, video })
}

/// URI of the first `#EXT-X-MEDIA:TYPE=SUBTITLES` declaration.
pub fn find_subtitle_uri(lines: &[Line<'_>]) -> Result<String> {
    let mut declarations = lines
        .iter()
        .filter_map(|l| l.tag_value("EXT-X-MEDIA"))
        .filter(|value| AttributeList::parse(value).get("TYPE") == Some("SUBTITLES"));

    let first = declarations.next().ok_or_else(|| {
        SegmenterError::ManifestStructure(
            "no #EXT-X-MEDIA:TYPE=SUBTITLES declaration in master playlist".to_string(),
        )
    })?;

    let skipped = declarations.count();
    if skipped > 0 {
        tracing::warn!(
            "Master playlist declares {} additional subtitle track(s), using the first one",
            skipped
        );
    }

    AttributeList::parse(first)
        .get("URI")
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            SegmenterError::ManifestStructure(format!(
                "subtitle declaration has no URI attribute: {}",
                first
            ))
        })
}

/// Stream URI of the first `#EXT-X-STREAM-INF` whose CODECS list contains a
/// codec starting with `target_codec`.
pub fn find_video_uri<'a>(lines: &[Line<'a>], target_codec: &str) -> Result<&'a str> {
    let mut iter = lines.iter();
    while let Some(line) = iter.next() {
        let Some(value) = line.tag_value("EXT-X-STREAM-INF") else {
            continue;
        };
        let attrs = AttributeList::parse(value);
        let matches = attrs
            .get("CODECS")
            .map(|codecs| codecs.split(',').any(|c| c.trim().starts_with(target_codec)))
            .unwrap_or(false);
        if !matches {
            continue;
        }

        // The stream URI is the next URI line; tags in between are allowed.
        for next in iter.by_ref() {
            match next.kind {
                LineKind::Uri(uri) => return Ok(uri),
                LineKind::Tag { name, .. } if name == "EXT-X-STREAM-INF" => break,
                _ => {}
            }
        }
        return Err(SegmenterError::ManifestStructure(format!(
            "variant stream with codec {} has no URI line",
            target_codec
        )));
    }

    Err(SegmenterError::ManifestStructure(format!(
        "no variant stream with codec {} in master playlist",
        target_codec
    )))
}

/// Replace every occurrence of `old_uri` with `new_uri`.
///
/// Text that already reads `new_uri` is left alone, so applying the same
/// rewrite twice is a no-op even when `new_uri` contains `old_uri`.
pub fn rewrite_master_manifest(master_text: &str, old_uri: &str, new_uri: &str) -> String {
    if old_uri.is_empty() || old_uri == new_uri {
        return master_text.to_string();
    }

    let mut output = String::with_capacity(master_text.len());
    let mut rest = master_text;
    while !rest.is_empty() {
        if rest.starts_with(new_uri) {
            output.push_str(new_uri);
            rest = &rest[new_uri.len()..];
        } else if rest.starts_with(old_uri) {
            output.push_str(new_uri);
            rest = &rest[old_uri.len()..];
        } else {
            let ch = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            output.push_str(&rest[..ch]);
            rest = &rest[ch..];
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = r#"#EXTM3U
#EXT-X-VERSION:3
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aud",NAME="English",URI="audio/index.m3u8"
#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID="subs",LANGUAGE="en",NAME="English",DEFAULT=YES,AUTOSELECT=YES,FORCED=NO,URI="../subs/index_vtt.m3u8"
#EXT-X-STREAM-INF:BANDWIDTH=600000,CODECS="mp4a.40.2,hvc1.1.6.L93.B0",SUBTITLES="subs"
hevc/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=5500000,RESOLUTION=1920x1080,CODECS="avc1.640028,mp4a.40.2",AUDIO="aud",SUBTITLES="subs"

../video/1080p.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720,CODECS="avc1.4d001f,mp4a.40.2",SUBTITLES="subs"
../video/720p.m3u8
"#;

    #[test]
    fn test_locate_renditions() {
        let renditions = locate_renditions(MASTER, "out/asset/hls/master.m3u8", "avc1").unwrap();
        assert_eq!(renditions.subtitles.relative_uri, "../subs/index_vtt.m3u8");
        assert_eq!(renditions.subtitles.resolved_key, "out/asset/index_vtt.m3u8");
        // First matching rendition wins, blank line before the URI skipped.
        assert_eq!(renditions.video.relative_uri, "../video/1080p.m3u8");
        assert_eq!(renditions.video.resolved_key, "out/asset/1080p.m3u8");
    }

    #[test]
    fn test_codec_matched_anywhere_in_list() {
        let renditions = locate_renditions(MASTER, "a/master.m3u8", "hvc1").unwrap();
        assert_eq!(renditions.video.resolved_key, "a/hevc/index.m3u8");
    }

    #[test]
    fn test_missing_subtitle_declaration() {
        let master = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1,CODECS=\"avc1.64001f\"\nv.m3u8\n";
        let err = locate_renditions(master, "a/master.m3u8", "avc1").unwrap_err();
        assert!(matches!(err, SegmenterError::ManifestStructure(_)));
    }

    #[test]
    fn test_subtitle_declaration_without_uri() {
        let master = "#EXTM3U\n#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID=\"subs\",NAME=\"en\"\n";
        let lines = tokenize(master);
        let err = find_subtitle_uri(&lines).unwrap_err();
        assert!(err.to_string().contains("no URI attribute"));
    }

    #[test]
    fn test_no_matching_codec() {
        let lines = tokenize(MASTER);
        let err = find_video_uri(&lines, "av01").unwrap_err();
        assert!(matches!(err, SegmenterError::ManifestStructure(_)));
    }

    #[test]
    fn test_stream_inf_without_uri() {
        let master = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1,CODECS=\"avc1.64001f\"\n";
        let lines = tokenize(master);
        let err = find_video_uri(&lines, "avc1").unwrap_err();
        assert!(err.to_string().contains("no URI line"));
    }

    #[test]
    fn test_rewrite_master_manifest() {
        let rewritten = rewrite_master_manifest(
            MASTER,
            "../subs/index_vtt.m3u8",
            "../subs/segmented_vtt.m3u8",
        );
        assert!(rewritten.contains(r#"URI="../subs/segmented_vtt.m3u8""#));
        assert!(!rewritten.contains("index_vtt.m3u8"));
        assert_eq!(rewritten.lines().count(), MASTER.lines().count());
    }

    #[test]
    fn test_rewrite_master_manifest_idempotent() {
        let once = rewrite_master_manifest(MASTER, "index_vtt.m3u8", "segmented_vtt.m3u8");
        let twice = rewrite_master_manifest(&once, "index_vtt.m3u8", "segmented_vtt.m3u8");
        assert_eq!(once, twice);
        assert!(!twice.contains("index_vtt.m3u8"));
    }

    #[test]
    fn test_rewrite_when_new_contains_old() {
        let text = "URI=\"vtt.m3u8\"\n";
        let once = rewrite_master_manifest(text, "vtt.m3u8", "segmented_vtt.m3u8");
        assert_eq!(once, "URI=\"segmented_vtt.m3u8\"\n");
        let twice = rewrite_master_manifest(&once, "vtt.m3u8", "segmented_vtt.m3u8");
        assert_eq!(once, twice);
    }
}
