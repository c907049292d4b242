//! HLS WebVTT re-segmenter
//!
//! Rewrites the WebVTT subtitle track of a packaged HLS asset so that its
//! segments line up one-to-one with the segments of a video rendition, and
//! publishes a master manifest pointing at the new subtitle playlist.

pub mod config;
pub mod config_file;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod playlist;
pub mod segment;
pub mod storage;
pub mod subtitle;

#[cfg(test)]
mod tests;

pub use config::SegmenterConfig;
pub use error::{Result, SegmenterError};
pub use event::{ManifestLocation, TriggerEvent};
pub use pipeline::{run, Outcome, RunReport};
pub use storage::{FsStorage, MemoryStorage, Storage};
