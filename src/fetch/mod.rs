//! Fetch module containing the range request side of a job.
//!
//! # Examples
//!
//! ```rust,no_run
//! use segfetch::fetch::SegmentFetcher;
//! use segfetch::http::{create_http_client, HttpClientConfig};
//! use segfetch::segment::plan;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let url = reqwest::Url::parse("https://example.com/video.mp4")?;
//! let fetcher = SegmentFetcher::new(client, url);
//!
//! let mut segments = plan(1_000_000, 4, Path::new("video.mp4"))?;
//! let result = fetcher.fetch(&mut segments[0]).await;
//! println!("{:?}", result);
//! # Ok(())
//! # }
//! ```

pub mod fetcher;

pub use fetcher::{SegmentFetcher, DEFAULT_CHUNK_SIZE};
