//! Configuration structures and defaults for the coordinator.
//!
//! # Examples
//!
//! ```rust
//! use segfetch::coordinator::SegmentCallback;
//! use segfetch::segment::Segment;
//!
//! let callback: SegmentCallback = Box::new(|segment: &Segment| {
//!     match segment.failure() {
//!         None => println!("✓ segment {}", segment.index()),
//!         Some(failure) => println!("✗ {}", failure),
//!     }
//! });
//! ```

use crate::fetch::DEFAULT_CHUNK_SIZE;
use crate::progress::ProgressObserver;
use crate::segment::Segment;

use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for segment completion events
pub type SegmentCallback = Box<dyn Fn(&Segment) + Send + Sync>;

/// Default time a single segment may take.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration structure for the coordinator
#[derive(Clone)]
pub struct CoordinatorConfig {
    /// Number of transport retries per request. Zero unless opted into.
    pub retries: u32,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Timeout for establishing connections.
    pub connect_timeout: Option<Duration>,
    /// Time a single segment may take before it fails with a timeout.
    pub fetch_timeout: Option<Duration>,
    /// Read/write buffer size used for fetching and merging.
    pub chunk_size: usize,
    /// Use range requests to get content length instead of HEAD requests.
    pub use_range_for_content_length: bool,
    /// Progress observer.
    pub observer: Option<Arc<dyn ProgressObserver>>,
    /// Callback for when each segment reaches a terminal state.
    pub on_complete: Option<Arc<SegmentCallback>>,
}

impl std::fmt::Debug for CoordinatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorConfig")
            .field("retries", &self.retries)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("connect_timeout", &self.connect_timeout)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("chunk_size", &self.chunk_size)
            .field(
                "use_range_for_content_length",
                &self.use_range_for_content_length,
            )
            .field("observer", &self.observer.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            retries: 0,
            headers: None,
            proxy: None,
            connect_timeout: None,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            chunk_size: DEFAULT_CHUNK_SIZE,
            use_range_for_content_length: false,
            observer: None,
            on_complete: None,
        }
    }
}
