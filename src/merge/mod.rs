//! Merge module containing the ordered reassembly of fetched segments.
//!
//! # Examples
//!
//! ```rust,no_run
//! use segfetch::merge::Merger;
//! use segfetch::segment::Segment;
//! use std::path::Path;
//!
//! # async fn example(segments: Vec<Segment>) -> Result<(), Box<dyn std::error::Error>> {
//! let output = Merger::new()
//!     .merge(&segments, Path::new("video.mp4"), 1_000_000)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod merger;

pub use merger::Merger;
