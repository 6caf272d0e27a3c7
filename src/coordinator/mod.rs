//! Coordinator module containing the job runner, its builder and configuration.
//!
//! # Overview
//!
//! - `coordinator` - [`Coordinator`], which probes, plans, fetches and merges
//! - `builder` - [`CoordinatorBuilder`] for configuring a coordinator
//! - `config` - configuration structure and callback types
//!
//! # Examples
//!
//! ```rust,no_run
//! use segfetch::coordinator::CoordinatorBuilder;
//! use segfetch::job::DownloadJob;
//! use std::convert::TryFrom;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = CoordinatorBuilder::new().build();
//! let job = DownloadJob::try_from("https://example.com/video.mp4")?;
//! let outcome = coordinator.run(&job).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Cancellation
//!
//! ```rust,no_run
//! use segfetch::coordinator::CoordinatorBuilder;
//! use segfetch::job::DownloadJob;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(job: DownloadJob) -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = CoordinatorBuilder::new().build();
//! let cancel = CancellationToken::new();
//! let handle = {
//!     let cancel = cancel.clone();
//!     tokio::spawn(async move { coordinator.run_with_cancel(&job, cancel).await })
//! };
//! cancel.cancel();
//! let outcome = handle.await??;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod coordinator;

pub use builder::CoordinatorBuilder;
pub use config::{CoordinatorConfig, SegmentCallback, DEFAULT_FETCH_TIMEOUT};
pub use coordinator::Coordinator;
