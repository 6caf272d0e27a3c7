//! Job outcome reporting.
//!
//! A [`JobOutcome`] is the single terminal result of running a
//! [`DownloadJob`](super::DownloadJob) through the coordinator.
//!
//! ```rust
//! use segfetch::job::JobOutcome;
//!
//! # fn report(outcome: JobOutcome) {
//! match outcome {
//!     JobOutcome::MergeSucceeded { path, bytes } => {
//!         println!("{} bytes written to {}", bytes, path.display())
//!     }
//!     JobOutcome::JobFailed { failures } => {
//!         for failure in failures {
//!             println!("{}", failure);
//!         }
//!     }
//!     JobOutcome::Cancelled => println!("cancelled"),
//! }
//! # }
//! ```

use crate::error::ErrorKind;
use crate::segment::SegmentFailure;

use std::path::PathBuf;

/// Terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Every segment was fetched and merged into the output.
    ///
    /// Merged artifacts are removed; one whose removal failed is logged and
    /// left behind without affecting the outcome.
    MergeSucceeded {
        /// Path of the merged output.
        path: PathBuf,
        /// Size of the merged output.
        bytes: u64,
    },
    /// At least one segment failed; nothing was merged.
    JobFailed {
        /// Failed segments, sorted by index.
        failures: Vec<SegmentFailure>,
    },
    /// The caller cancelled the job before all segments finished.
    Cancelled,
}

impl JobOutcome {
    /// Return `true` if the output was merged.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::MergeSucceeded { .. })
    }

    /// Path of the merged output, on success.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            JobOutcome::MergeSucceeded { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Failed segments, empty unless the job failed.
    pub fn failures(&self) -> &[SegmentFailure] {
        match self {
            JobOutcome::JobFailed { failures } => failures,
            _ => &[],
        }
    }

    /// Indices of the failed segments.
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures().iter().map(|f| f.index).collect()
    }

    /// Return `true` if every failure is worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            JobOutcome::JobFailed { failures } => {
                !failures.is_empty() && failures.iter().all(|f| f.retryable)
            }
            _ => false,
        }
    }

    /// Return `true` if some segment failed with `kind`.
    pub fn has_failure(&self, kind: ErrorKind) -> bool {
        self.failures().iter().any(|f| f.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn failure(index: usize, error: Error) -> SegmentFailure {
        SegmentFailure::from_error(index, 0, &error)
    }

    #[test]
    fn test_success_accessors() {
        let outcome = JobOutcome::MergeSucceeded {
            path: PathBuf::from("video.mp4"),
            bytes: 100,
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.path(), Some(&PathBuf::from("video.mp4")));
        assert!(outcome.failures().is_empty());
        assert!(!outcome.is_retryable());
    }

    #[test]
    fn test_failure_accessors() {
        let outcome = JobOutcome::JobFailed {
            failures: vec![
                failure(
                    2,
                    Error::StreamInterrupted {
                        index: 2,
                        written: 0,
                        expected: 34,
                        reason: "reset".into(),
                    },
                ),
                failure(
                    3,
                    Error::RangeUnsupported {
                        index: 3,
                        reason: "200 OK".into(),
                    },
                ),
            ],
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.failed_indices(), vec![2, 3]);
        assert!(outcome.has_failure(ErrorKind::RangeUnsupported));
        assert!(!outcome.is_retryable());
    }

    #[test]
    fn test_cancelled() {
        assert!(!JobOutcome::Cancelled.is_success());
        assert!(JobOutcome::Cancelled.path().is_none());
    }
}
