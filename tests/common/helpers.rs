use rand::Rng;
use segfetch::progress::StyleOptions;
use segfetch::{create_http_client, CoordinatorBuilder, DownloadJob, HttpClientConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use reqwest_middleware::ClientWithMiddleware;

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates random test content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    let mut content = vec![0u8; size];
    rand::rng().fill(&mut content[..]);
    content
}

/// Installs a test subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that nothing exists at the given path
pub fn assert_file_missing(path: &Path) {
    assert!(!path.exists(), "File should not exist at path: {:?}", path);
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Lists the segment artifacts (`*.part<N>`) left in `dir`, sorted by name.
pub fn leftover_artifacts(dir: &Path) -> Vec<PathBuf> {
    let mut artifacts: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.starts_with("part"))
        })
        .collect();
    artifacts.sort();
    artifacts
}

/// Creates a coordinator builder suited to tests: no retries, no bars, short timeout.
pub fn create_test_coordinator() -> CoordinatorBuilder {
    CoordinatorBuilder::new()
        .retries(0)
        .fetch_timeout(Some(Duration::from_secs(10)))
        .progress_bars(StyleOptions::hidden())
}

/// Creates a job for `url` writing `name` into `dir`.
pub fn create_test_job(url: &str, dir: &Path, name: &str, segments: usize) -> DownloadJob {
    let url = reqwest::Url::parse(url).expect("Failed to parse test URL");
    DownloadJob::new(&url, dir.join(name)).with_segments(segments)
}

/// Creates an HTTP client without retries.
pub fn create_test_client() -> ClientWithMiddleware {
    create_http_client(HttpClientConfig {
        retries: 0,
        ..HttpClientConfig::default()
    })
    .expect("Failed to create HTTP client")
}
