//! Scenario testing module
//!
//! End-to-end tests for the segmenter:
//! - In-memory packaged assets
//! - Playlist and WebVTT validation
//! - Full pipeline runs

pub mod e2e;
