//! Builder pattern implementation for creating Coordinator instances.
//!
//! # Examples
//!
//! ```rust
//! use segfetch::coordinator::CoordinatorBuilder;
//! use reqwest::header::{HeaderMap, USER_AGENT};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyApp/1.0".parse()?);
//!
//! let coordinator = CoordinatorBuilder::new()
//!     .headers(headers)
//!     .fetch_timeout(Some(Duration::from_secs(120)))
//!     .on_complete(|segment| {
//!         if let Some(failure) = segment.failure() {
//!             eprintln!("{}", failure);
//!         }
//!     })
//!     .build();
//! # Ok(())
//! # }
//! ```

use super::{
    config::{CoordinatorConfig, SegmentCallback},
    coordinator::Coordinator,
};
use crate::progress::{ProgressDisplay, ProgressObserver, StyleOptions};
use crate::segment::Segment;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{sync::Arc, time::Duration};

/// A builder used to create a [`Coordinator`].
///
/// ```rust
/// use segfetch::coordinator::CoordinatorBuilder;
///
/// let c = CoordinatorBuilder::new().retries(5).chunk_size(16 * 1024).build();
/// ```
#[derive(Default)]
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        CoordinatorBuilder::default()
    }

    /// Opt into transport retries of each request.
    ///
    /// No request is retried unless this is set.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Route every request through `proxy`.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Set the connection establishment timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set how long one segment may take; `None` disables the limit.
    pub fn fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Set the read/write buffer size used while fetching and merging.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size.max(1);
        self
    }

    /// Use range requests to get content length instead of HEAD requests.
    ///
    /// This is useful when servers don't provide accurate Content-Length headers
    /// in HEAD requests but do support range requests with Content-Range responses.
    pub fn use_range_for_content_length(mut self, use_range: bool) -> Self {
        self.config.use_range_for_content_length = use_range;
        self
    }

    /// Attach a progress observer.
    pub fn observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Draw terminal progress bars with the given style.
    pub fn progress_bars(self, style_options: StyleOptions) -> Self {
        self.observer(Arc::new(ProgressDisplay::new(style_options)))
    }

    /// Set callback for when each segment reaches a terminal state.
    ///
    /// The callback runs on the coordinator as outcomes arrive, in completion
    /// order, not in index order.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Segment) + Send + Sync + 'static,
    {
        let callback: SegmentCallback = Box::new(callback);
        self.config.on_complete = Some(Arc::new(callback));
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be merged into a single one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add one http header.
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use segfetch::coordinator::CoordinatorBuilder;
    ///
    /// let referer = HeaderValue::from_static("https://example.com/watch");
    /// let coordinator = CoordinatorBuilder::new()
    ///     .header(header::REFERER, referer)
    ///     .build();
    /// assert!(coordinator.headers().is_some());
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Coordinator`] with the specified options.
    pub fn build(self) -> Coordinator {
        Coordinator::new(self.config)
    }
}
