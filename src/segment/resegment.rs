//! Cutting the cue timeline into per-window WebVTT files

use super::window::SegmentWindow;
use crate::subtitle::cue::BLOCK_SEPARATOR;
use crate::subtitle::Timeline;

/// The WebVTT file generated for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFile {
    pub window: SegmentWindow,
    /// Number of cues in the file
    pub cue_count: usize,
    pub text: String,
}

/// Build one WebVTT file per window from the cues starting inside it.
///
/// Cues keep timeline order. Every file starts with the timeline header;
/// a window without cues gets a header-only file. With `relative_timestamps`
/// cue times are rewritten relative to the window start.
pub fn resegment(
    timeline: &Timeline,
    windows: &[SegmentWindow],
    relative_timestamps: bool,
) -> Vec<WindowFile> {
    windows
        .iter()
        .map(|window| {
            let mut text = String::new();
            text.push_str(timeline.header());
            text.push_str(BLOCK_SEPARATOR);

            let mut cue_count = 0;
            for cue in timeline.cues().iter().filter(|c| window.contains(c.start_seconds)) {
                if relative_timestamps {
                    text.push_str(&cue.render_relative(window.start_seconds()));
                } else {
                    text.push_str(&cue.render());
                }
                text.push_str(BLOCK_SEPARATOR);
                cue_count += 1;
            }

            tracing::debug!("Window {} holds {} cue(s)", window, cue_count);
            WindowFile {
                window: window.clone(),
                cue_count,
                text,
            }
        })
        .collect()
}
