//! Single segment fetching.
//!
//! A [`SegmentFetcher`] downloads one [`Segment`] with a range request and
//! streams the body into the segment's temporary artifact. It never returns an
//! error: every failure is captured in the [`FetchResult`] stored on the
//! segment.

use crate::error::{Error, Result};
use crate::progress::ProgressObserver;
use crate::segment::{FetchResult, Segment, SegmentFailure};
use crate::utils::parse_content_range;

use futures::StreamExt;
use reqwest::{
    header::{CONTENT_RANGE, RANGE},
    StatusCode, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{debug, instrument, warn};

/// Default size of the write buffer, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Fetches byte ranges of one URL into temporary artifacts.
#[derive(Clone)]
pub struct SegmentFetcher {
    client: ClientWithMiddleware,
    url: Url,
    chunk_size: usize,
    timeout: Option<Duration>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl fmt::Debug for SegmentFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentFetcher")
            .field("url", &self.url.as_str())
            .field("chunk_size", &self.chunk_size)
            .field("timeout", &self.timeout)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SegmentFetcher {
    /// Creates a fetcher for `url` using `client`.
    pub fn new(client: ClientWithMiddleware, url: Url) -> Self {
        Self {
            client,
            url,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: None,
            observer: None,
        }
    }

    /// Set the write buffer size. Zero is bumped to one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Fail segments that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Report byte progress to `observer`.
    pub fn with_observer(mut self, observer: Option<Arc<dyn ProgressObserver>>) -> Self {
        self.observer = observer;
        self
    }

    /// The URL ranges are fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch `segment` and record the outcome on it.
    ///
    /// A segment that is already terminal is left alone and its existing
    /// outcome is returned.
    #[instrument(skip(self, segment), fields(index = segment.index(), range = %segment.range()))]
    pub async fn fetch(&self, segment: &mut Segment) -> FetchResult {
        if let Some(result) = segment.result() {
            warn!("Segment already fetched");
            return result.clone();
        }

        let mut written = 0;
        let fetched = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.stream_range(segment, &mut written)).await
                {
                    Ok(fetched) => fetched,
                    Err(_) => Err(Error::Timeout {
                        index: segment.index(),
                        after: limit,
                    }),
                }
            }
            None => self.stream_range(segment, &mut written).await,
        };

        let result = match fetched {
            Ok(()) => {
                debug!(written, "Segment done");
                FetchResult::Done { written }
            }
            Err(e) => {
                warn!(written, error = %e, "Segment failed");
                FetchResult::Failed(SegmentFailure::from_error(segment.index(), written, &e))
            }
        };
        segment.finish(result.clone());
        result
    }

    /// Request the range of `segment` and write its body to the artifact.
    ///
    /// `written` only counts bytes that left the write buffer for the file, so
    /// it still matches the artifact when a timeout drops this future.
    async fn stream_range(&self, segment: &Segment, written: &mut u64) -> Result<()> {
        let index = segment.index();
        let expected = segment.expected_len();
        let interrupted = |written: u64, reason: String| Error::StreamInterrupted {
            index,
            written,
            expected,
            reason,
        };

        debug!("Requesting {}", segment.range().header_value());
        let res = self
            .client
            .get(self.url.clone())
            .header(RANGE, segment.range().header_value())
            .send()
            .await
            .map_err(|e| interrupted(0, e.to_string()))?;

        if res.status() != StatusCode::PARTIAL_CONTENT {
            return Err(Error::range_status(index, res.status()));
        }

        let served = res
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        if let Some((start, end, _)) = served {
            if (start, end) != (segment.start(), segment.end()) {
                return Err(Error::RangeUnsupported {
                    index,
                    reason: format!("asked for {}, server sent [{}, {}]", segment.range(), start, end),
                });
            }
        }

        if let Some(dir) = segment.artifact().parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        debug!("Creating temporary artifact {:?}", segment.artifact());
        let file = File::create(segment.artifact()).await?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);

        let mut received: u64 = 0;
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            // Keep what already arrived on disk before giving up.
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    writer.flush().await?;
                    *written = received;
                    return Err(interrupted(received, e.to_string()));
                }
            };
            let len = chunk.len() as u64;
            if received + len > expected {
                writer.flush().await?;
                *written = received;
                return Err(interrupted(
                    received,
                    format!("server sent more than {} bytes", expected),
                ));
            }
            writer.write_all(&chunk).await?;
            received += len;
            *written = received - writer.buffer().len() as u64;
            if let Some(observer) = &self.observer {
                observer.on_progress(index, received, expected);
            }
        }
        writer.flush().await?;
        *written = received;

        if *written != expected {
            return Err(interrupted(
                *written,
                "stream ended before the expected length".into(),
            ));
        }
        Ok(())
    }
}
