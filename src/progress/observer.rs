//! Progress observation hooks.
//!
//! A [`ProgressObserver`] is told about the plan, the byte progress of every
//! segment, finished segments, and the merge. It is purely advisory: the
//! download behaves the same whether an observer is attached or not.
//!
//! Any `Fn(usize, u64, u64)` closure is an observer receiving
//! `(segment index, bytes so far, expected bytes)`:
//!
//! ```rust
//! use segfetch::progress::ProgressObserver;
//! use std::sync::Arc;
//!
//! let observer: Arc<dyn ProgressObserver> = Arc::new(|index: usize, done: u64, total: u64| {
//!     println!("segment {index}: {done}/{total}");
//! });
//! observer.on_progress(1, 10, 100);
//! ```

use crate::segment::Segment;

/// Receives progress notifications from a running job.
///
/// Calls may come from several segment tasks at once.
pub trait ProgressObserver: Send + Sync {
    /// A segment wrote more bytes to its temporary artifact.
    fn on_progress(&self, index: usize, bytes_so_far: u64, expected: u64);

    /// The job has been planned into `segments`.
    fn on_planned(&self, _segments: &[Segment]) {}

    /// A segment reached a terminal state.
    fn on_segment_finished(&self, _segment: &Segment) {}

    /// The merge appended more bytes to the output.
    fn on_merge_progress(&self, _bytes_so_far: u64, _expected: u64) {}

    /// The job reached its outcome, whatever it is.
    fn on_finished(&self) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, u64, u64) + Send + Sync,
{
    fn on_progress(&self, index: usize, bytes_so_far: u64, expected: u64) {
        self(index, bytes_so_far, expected)
    }
}
