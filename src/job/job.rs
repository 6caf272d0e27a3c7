//! Download job description.
//!
//! A [`DownloadJob`] names what to fetch, where the merged output goes, how
//! many segments to split it into, and optionally the total size when the
//! caller already knows it.
//!
//! # Examples
//!
//! ```rust
//! use segfetch::job::DownloadJob;
//! use std::convert::TryFrom;
//!
//! // File name taken from the URL.
//! let job = DownloadJob::try_from("https://example.com/media/clip.mp4")?;
//! assert_eq!(job.output.file_name().unwrap(), "clip.mp4");
//!
//! // Output named after a title.
//! let url = reqwest::Url::parse("https://example.com/v/123")?;
//! let job = DownloadJob::titled(&url, "videos", "My trip: day 1")
//!     .with_segments(4)
//!     .with_total_size(1_048_576);
//! assert_eq!(job.output.file_name().unwrap(), "My trip_ day 1.mp4");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Error;

use reqwest::Url;
use std::convert::TryFrom;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Extension appended to titled outputs that have none.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Segment count used when none is requested: the available parallelism.
pub fn default_segment_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Describes one segmented download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// URL of the resource.
    pub url: Url,
    /// Path of the merged output file.
    pub output: PathBuf,
    /// Requested number of segments.
    pub segments: usize,
    /// Total size in bytes, probed from the server when `None`.
    pub total_size: Option<u64>,
}

impl DownloadJob {
    /// Creates a new [`DownloadJob`] writing to `output`.
    pub fn new(url: &Url, output: impl Into<PathBuf>) -> Self {
        Self {
            url: url.clone(),
            output: output.into(),
            segments: default_segment_count(),
            total_size: None,
        }
    }

    /// Creates a job whose output is named after a human readable title.
    ///
    /// Characters that can't appear in a file name are replaced by `_` and
    /// [`DEFAULT_EXTENSION`] is appended when the title has no extension.
    pub fn titled(url: &Url, directory: impl AsRef<Path>, title: &str) -> Self {
        Self::new(url, directory.as_ref().join(file_name_from_title(title)))
    }

    /// Set the requested number of segments.
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Set the known total size of the resource.
    pub fn with_total_size(mut self, total_size: u64) -> Self {
        self.total_size = Some(total_size);
        self
    }

    /// Put the output in `directory`, keeping its file name.
    pub fn in_directory(mut self, directory: impl AsRef<Path>) -> Self {
        if let Some(name) = self.output.file_name() {
            self.output = directory.as_ref().join(name);
        }
        self
    }
}

/// Turn a title into a usable file name.
pub fn file_name_from_title(title: &str) -> String {
    let mut name: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    name = name.trim_matches('.').to_string();
    if name.is_empty() {
        name.push_str("video");
    }
    let has_extension = Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });
    if !has_extension {
        name.push('.');
        name.push_str(DEFAULT_EXTENSION);
    }
    name
}

impl TryFrom<&Url> for DownloadJob {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        value
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "The url \"{}\" does not contain a valid path",
                    value
                ))
            })?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .map(|filename| {
                form_urlencoded::parse(filename.as_bytes())
                    .map(|(key, val)| [key, val].concat())
                    .collect::<String>()
            })
            .map(|filename| DownloadJob::new(value, filename))
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", value))
            })
    }
}

impl TryFrom<&str> for DownloadJob {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| DownloadJob::try_from(&u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "http://domain.com/file.mp4";

    #[test]
    fn test_job_from_str() {
        let job = DownloadJob::try_from(DOMAIN).unwrap();
        assert_eq!(job.output, PathBuf::from("file.mp4"));
        assert_eq!(job.url.as_str(), DOMAIN);
        assert!(job.total_size.is_none());
        assert!(job.segments >= 1);
    }

    #[test]
    fn test_job_from_encoded_url() {
        let job = DownloadJob::try_from("http://domain.com/my%20clip.mp4").unwrap();
        assert_eq!(job.output, PathBuf::from("my clip.mp4"));
    }

    #[test]
    fn test_job_without_filename() {
        assert!(DownloadJob::try_from("http://domain.com/").is_err());
        assert!(DownloadJob::try_from("not a url").is_err());
    }

    #[test]
    fn test_builders() {
        let job = DownloadJob::try_from(DOMAIN)
            .unwrap()
            .with_segments(3)
            .with_total_size(100)
            .in_directory("out");
        assert_eq!(job.segments, 3);
        assert_eq!(job.total_size, Some(100));
        assert_eq!(job.output, PathBuf::from("out/file.mp4"));
    }

    #[test]
    fn test_file_name_from_title() {
        assert_eq!(file_name_from_title("Cats / Dogs?"), "Cats _ Dogs_.mp4");
        assert_eq!(file_name_from_title("clip.webm"), "clip.webm");
        assert_eq!(file_name_from_title("Ep. 3 recap"), "Ep. 3 recap.mp4");
        assert_eq!(file_name_from_title("  "), "video.mp4");
        assert_eq!(file_name_from_title(".."), "video.mp4");
    }

    #[test]
    fn test_titled_job() {
        let url = Url::parse("http://domain.com/v/1").unwrap();
        let job = DownloadJob::titled(&url, "videos", "Sunset");
        assert_eq!(job.output, PathBuf::from("videos/Sunset.mp4"));
    }
}
