//! segfetch downloads a large remote file in parallel byte-range segments and
//! reassembles them into a byte-identical copy.
//!
//! The resource is split into contiguous ranges, every range is fetched by its
//! own task into a private temporary file, and once every task has reported
//! the temporary files are concatenated in range order. A single failed
//! segment fails the whole job: nothing is merged and the temporary files are
//! left for inspection.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use segfetch::{CoordinatorBuilder, DownloadJob, Error, JobOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let url = reqwest::Url::parse("https://example.com/media/123")
//!     .map_err(|e| Error::InvalidUrl(e.to_string()))?;
//! let job = DownloadJob::titled(&url, "videos", "Evening news").with_segments(8);
//!
//! let coordinator = CoordinatorBuilder::new().build();
//! if let JobOutcome::MergeSucceeded { path, .. } = coordinator.run(&job).await? {
//!     println!("saved to {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`segment`] - Byte ranges, segments and the pure planner
//! - [`fetch`] - Range requests streamed into temporary artifacts
//! - [`merge`] - Ordered, size-checked reassembly
//! - [`coordinator`] - The `Coordinator` running a job end to end, and its builder
//! - [`job`] - `DownloadJob` and `JobOutcome`
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client functionality
//! - [`progress`] - Progress observer hooks and terminal progress bars
//! - [`utils`] - Content length helpers

pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod http;
pub mod job;
pub mod merge;
pub mod progress;
pub mod segment;
pub mod utils;

pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use error::{Error, ErrorKind, Result};
pub use fetch::SegmentFetcher;
pub use http::{create_http_client, HttpClientConfig};
pub use job::{DownloadJob, JobOutcome};
pub use merge::Merger;
pub use progress::{ProgressBarOpts, ProgressDisplay, ProgressObserver, StyleOptions};
pub use segment::{plan, split, ByteRange, FetchResult, Segment, SegmentFailure, SegmentState};
pub use utils::content_length::{
    content_length_from_headers, parse_content_range, parse_content_range_total,
    probe_content_length,
};
