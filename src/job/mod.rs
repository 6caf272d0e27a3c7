//! Job module containing what to download and how it ended.
//!
//! # Overview
//!
//! - `job` - [`DownloadJob`], the description of one segmented download
//! - `outcome` - [`JobOutcome`], its terminal result
//!
//! # Examples
//!
//! ```rust
//! use segfetch::job::DownloadJob;
//! use std::convert::TryFrom;
//!
//! let job = DownloadJob::try_from("https://example.com/clip.mp4")?
//!     .with_segments(8)
//!     .in_directory("downloads");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[allow(clippy::module_inception)]
pub mod job;
pub mod outcome;

pub use job::{default_segment_count, file_name_from_title, DownloadJob, DEFAULT_EXTENSION};
pub use outcome::JobOutcome;
