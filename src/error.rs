//! Error handling for segfetch.
//!
//! This module provides the [`Error`] enum covering every failure a segmented
//! download can run into, from planning through fetching to the final merge,
//! and the copyable [`ErrorKind`] used when failures are carried around as data.

use reqwest::StatusCode;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can happen when using segfetch.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Captures failures that don't fit into other categories, such as a fetch
    /// task that vanished without reporting.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The total size of the resource is zero, so there is nothing to plan.
    #[error("Invalid resource size: {0} bytes")]
    InvalidSize(u64),

    /// The requested segment count is zero.
    #[error("Invalid segment count: {0}")]
    InvalidCount(usize),

    /// The total size of the resource could not be determined.
    #[error("Cannot determine resource size: {0}")]
    SizeProbe(String),

    /// The server ignored or rejected the byte-range request.
    #[error("Segment {index}: range request not honored: {reason}")]
    RangeUnsupported {
        /// Index of the segment.
        index: usize,
        /// What the server answered instead.
        reason: String,
    },

    /// The body stream ended early, broke, or delivered the wrong length.
    #[error("Segment {index}: stream interrupted after {written}/{expected} bytes: {reason}")]
    StreamInterrupted {
        /// Index of the segment.
        index: usize,
        /// Bytes written to the temporary artifact before the interruption.
        written: u64,
        /// Bytes the segment was expected to hold.
        expected: u64,
        /// Underlying cause.
        reason: String,
    },

    /// The segment did not finish within the configured fetch timeout.
    #[error("Segment {index}: timed out after {after:?}")]
    Timeout {
        /// Index of the segment.
        index: usize,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Local read/write failure or final size mismatch while merging.
    #[error("Merge failed: {reason}")]
    MergeIo {
        /// What went wrong.
        reason: String,
        /// The I/O error behind the failure, if any.
        #[source]
        source: Option<io::Error>,
    },

    /// The job was cancelled by the caller.
    #[error("Cancelled")]
    Cancelled,

    /// I/O Error.
    ///
    /// Wraps standard I/O errors raised while creating or writing temporary
    /// artifacts during a fetch.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Build a [`Error::MergeIo`] from an I/O failure.
    pub(crate) fn merge_io(reason: impl Into<String>, source: io::Error) -> Self {
        Error::MergeIo {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Build a [`Error::RangeUnsupported`] for a status other than 206.
    pub(crate) fn range_status(index: usize, status: StatusCode) -> Self {
        Error::RangeUnsupported {
            index,
            reason: format!("expected 206 Partial Content, got {}", status),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSize(_) => ErrorKind::InvalidSize,
            Error::InvalidCount(_) => ErrorKind::InvalidCount,
            Error::SizeProbe(_) => ErrorKind::SizeProbe,
            Error::RangeUnsupported { .. } => ErrorKind::RangeUnsupported,
            Error::StreamInterrupted { .. } | Error::Reqwest { .. } | Error::Middleware { .. } => {
                ErrorKind::StreamInterrupted
            }
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::MergeIo { .. } => ErrorKind::MergeIo,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::IOError { .. } => ErrorKind::Io,
            Error::Internal(_) | Error::InvalidUrl(_) => ErrorKind::Internal,
        }
    }
}

/// Classification of an [`Error`], cheap to copy into failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSize,
    InvalidCount,
    SizeProbe,
    RangeUnsupported,
    StreamInterrupted,
    Timeout,
    MergeIo,
    Cancelled,
    /// Local file system failure outside of the merge.
    Io,
    Internal,
}

impl ErrorKind {
    /// Whether re-running the failed work has a reasonable chance to succeed.
    ///
    /// A server that does not honor ranges will not start doing so on a retry,
    /// and planning errors are caller mistakes.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::StreamInterrupted | ErrorKind::Timeout | ErrorKind::Io | ErrorKind::SizeProbe
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidSize => "invalid size",
            ErrorKind::InvalidCount => "invalid count",
            ErrorKind::SizeProbe => "size probe",
            ErrorKind::RangeUnsupported => "range unsupported",
            ErrorKind::StreamInterrupted => "stream interrupted",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MergeIo => "merge i/o",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Io => "i/o",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Result type alias for operations that can fail with a segfetch error.
pub type Result<T> = std::result::Result<T, Error>;
