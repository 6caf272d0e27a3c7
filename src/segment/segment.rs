//! Segment types.
//!
//! A [`Segment`] is one planned byte range of the remote resource together
//! with the private temporary artifact its bytes are streamed into. Each
//! segment starts [`SegmentState::Pending`] and is moved exactly once to a
//! terminal state by the task that fetches it.

use crate::error::{Error, ErrorKind};

use std::fmt;
use std::path::{Path, PathBuf};

/// An inclusive byte interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset, inclusive.
    pub end: u64,
}

impl ByteRange {
    /// Create a new [`ByteRange`].
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always `false`; an inclusive range holds at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value of the `Range` request header for this interval.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Why a segment failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFailure {
    /// Index of the failed segment.
    pub index: usize,
    /// Error classification.
    pub kind: ErrorKind,
    /// Whether re-fetching the segment is worth a try.
    pub retryable: bool,
    /// Bytes written to the temporary artifact before failing.
    pub written: u64,
    /// Human readable details.
    pub message: String,
}

impl SegmentFailure {
    /// Describe `error` as the failure of segment `index`.
    pub fn from_error(index: usize, written: u64, error: &Error) -> Self {
        let kind = error.kind();
        Self {
            index,
            kind,
            retryable: kind.is_retryable(),
            written,
            message: error.to_string(),
        }
    }

    /// The failure reported for segments stopped by a cancellation.
    pub fn cancelled(index: usize, written: u64) -> Self {
        Self::from_error(index, written, &Error::Cancelled)
    }
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {} ({}): {}", self.index, self.kind, self.message)
    }
}

/// Terminal outcome of fetching one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Every expected byte was written to the temporary artifact.
    Done {
        /// Bytes written.
        written: u64,
    },
    /// The fetch failed.
    Failed(SegmentFailure),
}

impl FetchResult {
    /// Return `true` for [`FetchResult::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, FetchResult::Done { .. })
    }
}

/// Lifecycle of a [`Segment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentState {
    /// Not fetched yet.
    Pending,
    /// Fetch reached a terminal outcome.
    Finished(FetchResult),
}

/// One planned byte range of the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    index: usize,
    range: ByteRange,
    artifact: PathBuf,
    state: SegmentState,
}

impl Segment {
    /// Create a pending [`Segment`].
    pub fn new(index: usize, range: ByteRange, artifact: impl Into<PathBuf>) -> Self {
        Self {
            index,
            range,
            artifact: artifact.into(),
            state: SegmentState::Pending,
        }
    }

    /// 1-based position of the segment, which is also its merge position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The byte range covered by this segment.
    pub fn range(&self) -> ByteRange {
        self.range
    }

    /// First byte offset.
    pub fn start(&self) -> u64 {
        self.range.start
    }

    /// Last byte offset, inclusive.
    pub fn end(&self) -> u64 {
        self.range.end
    }

    /// Number of bytes the segment must hold once fetched.
    pub fn expected_len(&self) -> u64 {
        self.range.len()
    }

    /// Path of the temporary artifact.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Current state.
    pub fn state(&self) -> &SegmentState {
        &self.state
    }

    /// The fetch outcome, if the segment is terminal.
    pub fn result(&self) -> Option<&FetchResult> {
        match &self.state {
            SegmentState::Pending => None,
            SegmentState::Finished(result) => Some(result),
        }
    }

    /// Return `true` if the segment is done and holds exactly its expected length.
    pub fn is_complete(&self) -> bool {
        matches!(
            self.result(),
            Some(FetchResult::Done { written }) if *written == self.expected_len()
        )
    }

    /// Return the failure of this segment, if any.
    pub fn failure(&self) -> Option<&SegmentFailure> {
        match self.result() {
            Some(FetchResult::Failed(failure)) => Some(failure),
            _ => None,
        }
    }

    /// Move the segment to its terminal state.
    ///
    /// Returns `false` and leaves the segment untouched if it was already terminal.
    pub fn finish(&mut self, result: FetchResult) -> bool {
        if self.state != SegmentState::Pending {
            return false;
        }
        self.state = SegmentState::Finished(result);
        true
    }
}
