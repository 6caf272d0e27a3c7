//! Core coordinator implementation.
//!
//! The [`Coordinator`] runs a [`DownloadJob`] end to end: it probes the size
//! when needed, plans the segments, fetches all of them concurrently (one
//! task per segment), waits until every task has reported, and merges only
//! when all of them succeeded.
//!
//! # Examples
//!
//! ```rust,no_run
//! use segfetch::coordinator::CoordinatorBuilder;
//! use segfetch::job::{DownloadJob, JobOutcome};
//! use std::convert::TryFrom;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = CoordinatorBuilder::new().retries(2).build();
//! let job = DownloadJob::try_from("https://example.com/video.mp4")?.with_segments(8);
//!
//! match coordinator.run(&job).await? {
//!     JobOutcome::MergeSucceeded { path, bytes } => println!("{} ({} bytes)", path.display(), bytes),
//!     JobOutcome::JobFailed { failures } => eprintln!("{} segments failed", failures.len()),
//!     JobOutcome::Cancelled => eprintln!("cancelled"),
//! }
//! # Ok(())
//! # }
//! ```

use super::config::CoordinatorConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::fetch::SegmentFetcher;
use crate::http::{create_http_client, HttpClientConfig};
use crate::job::{DownloadJob, JobOutcome};
use crate::merge::Merger;
use crate::segment::{plan, FetchResult, Segment, SegmentFailure};
use crate::utils::probe_content_length;

use reqwest::header::HeaderMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::{fs, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Represents the download coordinator.
///
/// A coordinator can be created via its builder:
///
/// ```rust
/// use segfetch::coordinator::CoordinatorBuilder;
///
/// let c = CoordinatorBuilder::new().build();
/// ```
#[derive(Clone)]
pub struct Coordinator {
    config: CoordinatorConfig,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .finish()
    }
}

impl Coordinator {
    /// Creates a new Coordinator with the given configuration.
    pub(crate) fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Gets the number of transport retries per request.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the per-segment timeout.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.config.fetch_timeout
    }

    /// Gets the read/write buffer size.
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets whether to use range requests for content length.
    pub fn use_range_for_content_length(&self) -> bool {
        self.config.use_range_for_content_length
    }

    /// Run `job` to its outcome.
    ///
    /// Segment failures are reported through [`JobOutcome::JobFailed`]. Errors
    /// that stop the job outside of the fetch phase (size probe, planning,
    /// merge, client setup) are returned as `Err`.
    pub async fn run(&self, job: &DownloadJob) -> Result<JobOutcome> {
        self.run_with_cancel(job, CancellationToken::new()).await
    }

    /// Run `job`, stopping early when `cancel` is triggered.
    ///
    /// Cancelling before every segment has reported stops the outstanding
    /// fetches, removes the artifacts of unfinished segments, and yields
    /// [`JobOutcome::Cancelled`] without merging.
    #[instrument(skip(self, job, cancel), fields(url = %job.url, output = ?job.output))]
    pub async fn run_with_cancel(
        &self,
        job: &DownloadJob,
        cancel: CancellationToken,
    ) -> Result<JobOutcome> {
        let outcome = self.execute(job, &cancel).await;
        if let Some(observer) = &self.config.observer {
            observer.on_finished();
        }
        match &outcome {
            Ok(JobOutcome::MergeSucceeded { path, bytes }) => {
                info!(bytes, "Download complete: {:?}", path)
            }
            Ok(JobOutcome::JobFailed { failures }) => {
                warn!(failed = failures.len(), "Download failed")
            }
            Ok(JobOutcome::Cancelled) => info!("Download cancelled"),
            Err(e) => warn!(error = %e, "Download aborted"),
        }
        outcome
    }

    async fn execute(&self, job: &DownloadJob, cancel: &CancellationToken) -> Result<JobOutcome> {
        let client = create_http_client(HttpClientConfig {
            retries: self.config.retries,
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
            connect_timeout: self.config.connect_timeout,
        })?;

        let total_size = match job.total_size {
            Some(size) => size,
            None => {
                probe_content_length(&client, &job.url, self.config.use_range_for_content_length)
                    .await?
            }
        };

        let planned = plan(total_size, job.segments, &job.output)?;
        info!(total_size, segments = planned.len(), "Planned download");
        if let Some(observer) = &self.config.observer {
            observer.on_planned(&planned);
        }

        if cancel.is_cancelled() {
            return Ok(JobOutcome::Cancelled);
        }

        let fetcher = SegmentFetcher::new(client, job.url.clone())
            .with_chunk_size(self.config.chunk_size)
            .with_timeout(self.config.fetch_timeout)
            .with_observer(self.config.observer.clone());
        let segments = self.fetch_all(Arc::new(fetcher), &planned, cancel).await;

        let cancelled = segments
            .iter()
            .filter_map(Segment::failure)
            .any(|f| f.kind == ErrorKind::Cancelled);
        if cancelled || cancel.is_cancelled() {
            discard_partial(&segments).await;
            return Ok(JobOutcome::Cancelled);
        }

        let failures: Vec<SegmentFailure> = segments.iter().filter_map(incomplete).collect();
        if !failures.is_empty() {
            for failure in &failures {
                warn!(index = failure.index, kind = %failure.kind, "{}", failure.message);
            }
            return Ok(JobOutcome::JobFailed { failures });
        }

        let merger = Merger::new()
            .with_chunk_size(self.config.chunk_size)
            .with_observer(self.config.observer.clone());
        let path = merger.merge(&segments, &job.output, total_size).await?;

        Ok(JobOutcome::MergeSucceeded {
            path,
            bytes: total_size,
        })
    }

    /// Fetch every planned segment concurrently and wait for all of them.
    ///
    /// Tasks report their segment through a single completion channel; the
    /// returned segments are sorted by index whatever order they finished in.
    /// A task whose job is gone removes its own unfinished artifact.
    async fn fetch_all(
        &self,
        fetcher: Arc<SegmentFetcher>,
        planned: &[Segment],
        cancel: &CancellationToken,
    ) -> Vec<Segment> {
        let (tx, mut rx) = mpsc::channel::<Segment>(planned.len().max(1));

        // Dropping this future, for instance under a caller's timeout, stops
        // every task still fetching.
        let tasks = cancel.child_token();
        let _abandon = tasks.clone().drop_guard();

        for segment in planned.iter().cloned() {
            let fetcher = Arc::clone(&fetcher);
            let cancel = tasks.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut segment = segment;
                let fetched = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    _ = fetcher.fetch(&mut segment) => true,
                };
                if !fetched {
                    let written = fs::metadata(segment.artifact())
                        .await
                        .map(|m| m.len())
                        .unwrap_or(0);
                    debug!(index = segment.index(), written, "Segment cancelled");
                    segment.finish(FetchResult::Failed(SegmentFailure::cancelled(
                        segment.index(),
                        written,
                    )));
                }
                if let Err(mpsc::error::SendError(segment)) = tx.send(segment).await {
                    debug!(index = segment.index(), "Job abandoned");
                    discard_partial(std::slice::from_ref(&segment)).await;
                }
            });
        }
        drop(tx);

        let mut finished: Vec<Segment> = Vec::with_capacity(planned.len());
        while let Some(segment) = rx.recv().await {
            if let Some(ref callback) = self.config.on_complete {
                callback(&segment);
            }
            if let Some(observer) = &self.config.observer {
                observer.on_segment_finished(&segment);
            }
            finished.push(segment);
        }

        // A task that panicked dropped its sender without reporting.
        for segment in planned {
            if finished.iter().all(|s| s.index() != segment.index()) {
                let mut lost = segment.clone();
                let error = Error::Internal("fetch task ended without reporting".into());
                lost.finish(FetchResult::Failed(SegmentFailure::from_error(
                    lost.index(),
                    0,
                    &error,
                )));
                finished.push(lost);
            }
        }

        finished.sort_by_key(Segment::index);
        finished
    }
}

/// The failure of a segment that is not complete, if any.
fn incomplete(segment: &Segment) -> Option<SegmentFailure> {
    match segment.result() {
        Some(FetchResult::Failed(failure)) => Some(failure.clone()),
        Some(FetchResult::Done { written }) if *written != segment.expected_len() => {
            let error = Error::StreamInterrupted {
                index: segment.index(),
                written: *written,
                expected: segment.expected_len(),
                reason: "length mismatch".into(),
            };
            Some(SegmentFailure::from_error(segment.index(), *written, &error))
        }
        Some(FetchResult::Done { .. }) => None,
        None => {
            let error = Error::Internal("segment never fetched".into());
            Some(SegmentFailure::from_error(segment.index(), 0, &error))
        }
    }
}

/// Remove the artifacts of segments that did not complete.
async fn discard_partial(segments: &[Segment]) {
    for segment in segments.iter().filter(|s| !s.is_complete()) {
        match fs::remove_file(segment.artifact()).await {
            Ok(()) => debug!("Removed partial artifact {:?}", segment.artifact()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "Cannot remove {:?}", segment.artifact()),
        }
    }
}
