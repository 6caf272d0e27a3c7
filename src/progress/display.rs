//! Terminal progress display.
//!
//! [`ProgressDisplay`] is a [`ProgressObserver`] drawing `indicatif` bars: a
//! main bar counting finished segments, one byte bar per segment, and a byte
//! bar for the merge.
//!
//! ```rust
//! use segfetch::coordinator::CoordinatorBuilder;
//! use segfetch::progress::StyleOptions;
//!
//! let coordinator = CoordinatorBuilder::new()
//!     .progress_bars(StyleOptions::default())
//!     .build();
//! ```

use super::observer::ProgressObserver;
use crate::progress::StyleOptions;
use crate::segment::Segment;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::collections::HashMap;
use std::sync::Mutex;

/// Progress display manager that coordinates the bars of one job.
pub struct ProgressDisplay {
    /// The multi-progress instance for coordinating multiple progress bars.
    multi: MultiProgress,
    /// The main progress bar for overall progress.
    main: ProgressBar,
    /// One bar per segment, created on its first progress report.
    children: Mutex<HashMap<usize, ProgressBar>>,
    /// Byte bar of the merge, created when the merge starts.
    merge: Mutex<Option<ProgressBar>>,
    /// Style options for progress bars.
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a new progress display manager.
    pub fn new(style_options: StyleOptions) -> Self {
        let multi = match style_options.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };
        let main = multi.add(style_options.main().clone().to_progress_bar(0));

        Self {
            multi,
            main,
            children: Mutex::new(HashMap::new()),
            merge: Mutex::new(None),
            style_options,
        }
    }

    /// Get the main progress bar.
    pub fn main(&self) -> &ProgressBar {
        &self.main
    }

    /// Number of segment bars currently drawn.
    pub fn child_count(&self) -> usize {
        self.children.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// The merge bar, once the merge has started.
    pub fn merge_bar(&self) -> Option<ProgressBar> {
        self.merge.lock().ok().and_then(|bar| bar.as_ref().cloned())
    }

    fn child(&self, index: usize, expected: u64) -> Option<ProgressBar> {
        let mut children = self.children.lock().ok()?;
        let bar = children.entry(index).or_insert_with(|| {
            let bar = self
                .multi
                .add(self.style_options.child().clone().to_progress_bar(expected));
            bar.set_prefix(format!("#{}", index));
            bar
        });
        Some(bar.clone())
    }

    fn finish_bar(&self, bar: &ProgressBar, clear: bool) {
        if clear {
            bar.finish_and_clear();
        } else {
            bar.finish();
        }
    }
}

impl ProgressObserver for ProgressDisplay {
    fn on_progress(&self, index: usize, bytes_so_far: u64, expected: u64) {
        if let Some(bar) = self.child(index, expected) {
            bar.set_position(bytes_so_far);
        }
    }

    fn on_planned(&self, segments: &[Segment]) {
        self.main.set_length(segments.len() as u64);
        self.main.set_message("downloading");
        self.main.tick();
    }

    fn on_segment_finished(&self, segment: &Segment) {
        let bar = self
            .children
            .lock()
            .ok()
            .and_then(|mut children| children.remove(&segment.index()));
        if let Some(bar) = bar {
            self.finish_bar(&bar, self.style_options.child().clear);
        }
        self.main.inc(1);
    }

    fn on_merge_progress(&self, bytes_so_far: u64, expected: u64) {
        let Ok(mut merge) = self.merge.lock() else {
            return;
        };
        let bar = merge.get_or_insert_with(|| {
            self.main.set_message("merging");
            let bar = self
                .multi
                .add(self.style_options.child().clone().to_progress_bar(expected));
            bar.set_prefix("merge");
            bar.set_length(expected);
            bar
        });
        bar.set_position(bytes_so_far);
        if bytes_so_far >= expected {
            self.finish_bar(bar, self.style_options.child().clear);
        }
    }

    fn on_finished(&self) {
        if let Ok(mut children) = self.children.lock() {
            for (_, bar) in children.drain() {
                bar.finish_and_clear();
            }
        }
        if let Some(bar) = self.merge_bar().filter(|bar| !bar.is_finished()) {
            bar.finish_and_clear();
        }
        self.main.set_message("done");
        self.finish_bar(&self.main, self.style_options.main().clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::plan;
    use std::path::Path;

    #[test]
    fn test_bars_follow_segments() {
        let display = ProgressDisplay::new(StyleOptions::hidden());
        let segments = plan(100, 3, Path::new("video.mp4")).unwrap();

        display.on_planned(&segments);
        assert_eq!(display.main().length(), Some(3));

        display.on_progress(1, 10, 34);
        display.on_progress(2, 10, 34);
        display.on_progress(1, 20, 34);
        assert_eq!(display.child_count(), 2);

        display.on_segment_finished(&segments[0]);
        assert_eq!(display.child_count(), 1);
        assert_eq!(display.main().position(), 1);

        display.on_finished();
        assert_eq!(display.child_count(), 0);
        assert!(display.main().is_finished());
    }

    #[test]
    fn test_merge_bar_tracks_bytes() {
        let display = ProgressDisplay::new(StyleOptions::hidden());
        assert!(display.merge_bar().is_none());

        display.on_merge_progress(0, 100);
        display.on_merge_progress(34, 100);
        let bar = display.merge_bar().unwrap();
        assert_eq!(bar.length(), Some(100));
        assert_eq!(bar.position(), 34);
        assert!(!bar.is_finished());

        display.on_merge_progress(100, 100);
        assert_eq!(bar.position(), 100);
        assert!(bar.is_finished());
    }
}
