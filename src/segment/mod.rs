//! Segment module
//!
//! Splits the subtitle timeline on the video rendition's segment grid.

pub mod resegment;
pub mod window;

pub use resegment::{resegment, WindowFile};
pub use window::{build_segment_windows, SegmentWindow};
