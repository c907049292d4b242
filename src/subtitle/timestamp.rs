//! WebVTT timestamp parsing and formatting

use crate::error::{Result, SegmenterError};

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Parsed `<start> --> <end> [settings]` cue timing line.
#[derive(Debug, Clone, PartialEq)]
pub struct CueTiming {
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Cue settings after the end timestamp, if any.
    pub settings: Option<String>,
}

/// Parse a `[H+:]MM:SS[.fff]` timestamp into seconds.
pub fn parse_timestamp(s: &str) -> Result<f64> {
    let caps = regex!(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2}(?:\.\d+)?)$")
        .captures(s.trim())
        .ok_or_else(|| SegmenterError::CueFormat(format!("invalid timestamp: {:?}", s)))?;

    let hours = caps
        .get(1)
        .map(|m| m.as_str().parse::<u64>())
        .transpose()
        .map_err(|_| SegmenterError::CueFormat(format!("timestamp hours out of range: {:?}", s)))?
        .unwrap_or(0);
    // The regex guarantees these are digit strings.
    let minutes = caps[2].parse::<u64>().unwrap_or(0);
    let seconds = caps[3].parse::<f64>().unwrap_or(0.0);

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Format seconds as a WebVTT timestamp (HH:MM:SS.mmm).
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Whether a line looks like a cue timing line.
pub fn is_timing_line(line: &str) -> bool {
    line.contains("-->")
}

/// Parse a cue timing line.
pub fn parse_timing_line(line: &str) -> Result<CueTiming> {
    let caps = regex!(r"^\s*(\S+)\s+-->\s+(\S+)(?:\s+(.*?))?\s*$")
        .captures(line)
        .ok_or_else(|| SegmenterError::CueFormat(format!("invalid cue timing line: {:?}", line)))?;

    let start_seconds = parse_timestamp(&caps[1])?;
    let end_seconds = parse_timestamp(&caps[2])?;
    if end_seconds < start_seconds {
        return Err(SegmenterError::CueFormat(format!(
            "cue ends before it starts: {:?}",
            line
        )));
    }

    Ok(CueTiming {
        start_seconds,
        end_seconds,
        settings: caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty()),
    })
}

impl CueTiming {
    /// Render the timing line, shifting both timestamps by `-offset`.
    pub fn to_line_shifted(&self, offset: f64) -> String {
        let mut line = format!(
            "{} --> {}",
            format_timestamp(self.start_seconds - offset),
            format_timestamp(self.end_seconds - offset)
        );
        if let Some(settings) = &self.settings {
            line.push(' ');
            line.push_str(settings);
        }
        line
    }
}
