//! Ordered reassembly of segment artifacts.
//!
//! The [`Merger`] appends every temporary artifact to the output in index
//! order, removes each artifact once its bytes are safely in the output, and
//! checks the final size. On failure it stops where it is: artifacts that were
//! not merged yet stay on disk and the output is left partially written.

use crate::error::{Error, Result};
use crate::fetch::DEFAULT_CHUNK_SIZE;
use crate::progress::ProgressObserver;
use crate::segment::Segment;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufReader, BufWriter},
};
use tracing::{debug, info, instrument, warn};

/// Concatenates segment artifacts into the final output.
#[derive(Clone)]
pub struct Merger {
    chunk_size: usize,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field("chunk_size", &self.chunk_size)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

impl Merger {
    /// Creates a merger with the default buffer size.
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            observer: None,
        }
    }

    /// Set the read/write buffer size. Zero is bumped to one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Report merge progress to `observer`.
    pub fn with_observer(mut self, observer: Option<Arc<dyn ProgressObserver>>) -> Self {
        self.observer = observer;
        self
    }

    /// Merge `segments` into `output`, expecting `expected_total` bytes.
    ///
    /// `segments` must be sorted by index, starting at 1 without gaps.
    ///
    /// Each artifact is removed once its bytes are in the output. A removal
    /// that fails is logged and does not fail the merge: the output is already
    /// complete, so such an artifact is the only one that can outlive a
    /// successful merge.
    #[instrument(skip(self, segments), fields(segments = segments.len()))]
    pub async fn merge(
        &self,
        segments: &[Segment],
        output: &Path,
        expected_total: u64,
    ) -> Result<PathBuf> {
        if let Some((position, segment)) = segments
            .iter()
            .enumerate()
            .find(|(position, segment)| segment.index() != position + 1)
        {
            return Err(Error::MergeIo {
                reason: format!(
                    "segment {} found at merge position {}",
                    segment.index(),
                    position + 1
                ),
                source: None,
            });
        }

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::merge_io(format!("cannot create {:?}", dir), e))?;
        }

        debug!("Creating output {:?}", output);
        let file = File::create(output)
            .await
            .map_err(|e| Error::merge_io(format!("cannot create {:?}", output), e))?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);

        let mut total: u64 = 0;
        self.report(total, expected_total);
        for segment in segments {
            let artifact = segment.artifact();
            let source = File::open(artifact)
                .await
                .map_err(|e| Error::merge_io(format!("cannot open {:?}", artifact), e))?;
            let mut reader = BufReader::with_capacity(self.chunk_size, source);

            let copied = tokio::io::copy_buf(&mut reader, &mut writer)
                .await
                .map_err(|e| Error::merge_io(format!("cannot append {:?}", artifact), e))?;
            writer
                .flush()
                .await
                .map_err(|e| Error::merge_io(format!("cannot write {:?}", output), e))?;
            total += copied;
            self.report(total, expected_total);

            match fs::remove_file(artifact).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(error = %e, "Cannot remove merged artifact {:?}", artifact),
            }
            debug!(index = segment.index(), copied, "Segment merged");
        }

        writer
            .get_mut()
            .sync_all()
            .await
            .map_err(|e| Error::merge_io(format!("cannot sync {:?}", output), e))?;

        if total != expected_total {
            return Err(Error::MergeIo {
                reason: format!("merged {} bytes, expected {}", total, expected_total),
                source: None,
            });
        }

        info!(bytes = total, "Merged {:?}", output);
        Ok(output.to_path_buf())
    }

    fn report(&self, bytes_so_far: u64, expected: u64) {
        if let Some(observer) = &self.observer {
            observer.on_merge_progress(bytes_so_far, expected);
        }
    }
}
