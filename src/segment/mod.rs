//! Segment module containing the byte range model and the planner.
//!
//! # Overview
//!
//! - `segment` - [`Segment`], [`ByteRange`] and fetch outcome types
//! - `planner` - pure partitioning of a resource into segments
//!
//! # Examples
//!
//! ```rust
//! use segfetch::segment::plan;
//! use std::path::Path;
//!
//! let segments = plan(1000, 4, Path::new("downloads/video.mp4")).unwrap();
//! assert_eq!(segments.len(), 4);
//! assert_eq!(segments[3].end(), 999);
//! ```

pub mod planner;
#[allow(clippy::module_inception)]
pub mod segment;

pub use planner::{artifact_path, plan, split};
pub use segment::{ByteRange, FetchResult, Segment, SegmentFailure, SegmentState};
