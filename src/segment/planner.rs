//! Byte range planning.
//!
//! Splits a resource of known size into contiguous, non-overlapping ranges.
//! Every range is `ceil(total / count)` bytes long except the last one, which
//! takes whatever remains.
//!
//! ```rust
//! use segfetch::segment::split;
//!
//! let ranges = split(100, 3).unwrap();
//! let bounds: Vec<_> = ranges.iter().map(|r| (r.start, r.end)).collect();
//! assert_eq!(bounds, vec![(0, 33), (34, 67), (68, 99)]);
//! ```

use super::segment::{ByteRange, Segment};
use crate::error::{Error, Result};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Split `total_size` bytes into at most `count` contiguous ranges.
///
/// Ranges that would start past the end of the resource are not produced, so
/// fewer than `count` ranges come back when the ceiling division over-covers
/// (10 bytes in 7 ranges gives 5 ranges of 2 bytes).
pub fn split(total_size: u64, count: usize) -> Result<Vec<ByteRange>> {
    if total_size == 0 {
        return Err(Error::InvalidSize(total_size));
    }
    if count == 0 {
        return Err(Error::InvalidCount(count));
    }

    let per_segment = total_size.div_ceil(count as u64);
    let ranges = (0..count as u64)
        .map_while(|i| i.checked_mul(per_segment))
        .take_while(|start| *start < total_size)
        .map(|start| {
            let end = start.saturating_add(per_segment - 1).min(total_size - 1);
            ByteRange::new(start, end)
        })
        .collect();

    Ok(ranges)
}

/// Plan the segments of a download written to `output`.
///
/// Segment `i` streams into `<output>.part<i>`, next to the output file.
pub fn plan(total_size: u64, count: usize, output: &Path) -> Result<Vec<Segment>> {
    let segments = split(total_size, count)?
        .into_iter()
        .enumerate()
        .map(|(i, range)| Segment::new(i + 1, range, artifact_path(output, i + 1)))
        .collect();

    Ok(segments)
}

/// Path of the temporary artifact of segment `index`.
pub fn artifact_path(output: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(format!(".part{}", index));
    PathBuf::from(name)
}
