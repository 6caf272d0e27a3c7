//! Content length extraction utilities.
//!
//! This module provides utilities for reading the size of a remote resource,
//! either from a `Content-Length` header or from the total announced in a
//! `Content-Range` header, and for probing a URL for it.

use crate::error::{Error, Result};

use reqwest::{
    header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE, RANGE},
    StatusCode, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// Parse Content-Range header to extract total size.
///
/// Content-Range header format: "bytes start-end/total"
///
/// ```rust
/// use segfetch::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .nth(1)
        .and_then(|size| size.trim().parse::<u64>().ok())
}

/// Parse a Content-Range header into `(start, end, total)`.
///
/// The total is `None` when the server announced it as `*`.
///
/// ```rust
/// use segfetch::utils::parse_content_range;
///
/// assert_eq!(parse_content_range("bytes 34-67/100"), Some((34, 67, Some(100))));
/// assert_eq!(parse_content_range("bytes 0-9/*"), Some((0, 9, None)));
/// ```
pub fn parse_content_range(content_range: &str) -> Option<(u64, u64, Option<u64>)> {
    let spec = content_range.trim().strip_prefix("bytes")?.trim_start();
    let (range, total) = spec.split_once('/')?;
    let (start, end) = range.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = end.trim().parse::<u64>().ok()?;
    if end < start {
        return None;
    }
    let total = match total.trim() {
        "*" => None,
        t => Some(t.parse::<u64>().ok()?),
    };
    Some((start, end, total))
}

/// Read the `Content-Length` header.
///
/// Returns None if the header is missing or if its value is not an u64.
pub fn content_length_from_headers(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Probe the total size of the resource at `url`.
///
/// With `use_range` set, a `Range: bytes=0-0` GET is sent and the total is read
/// from the `Content-Range` answer; this helps with servers that don't report a
/// length on HEAD requests. Otherwise a HEAD request is sent and the
/// `Content-Length` is used.
pub async fn probe_content_length(
    client: &ClientWithMiddleware,
    url: &Url,
    use_range: bool,
) -> Result<u64> {
    let request = if use_range {
        client.get(url.clone()).header(RANGE, "bytes=0-0")
    } else {
        client.head(url.clone())
    };

    let res = request
        .send()
        .await
        .map_err(|e| Error::SizeProbe(format!("request to {} failed: {}", url, e)))?;

    let status = res.status();
    if !status.is_success() {
        return Err(Error::SizeProbe(format!("{} answered {}", url, status)));
    }

    let size = if status == StatusCode::PARTIAL_CONTENT {
        res.headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
    } else {
        content_length_from_headers(res.headers())
    };

    debug!(%url, ?size, "Probed content length");
    size.ok_or_else(|| Error::SizeProbe(format!("{} did not report a size", url)))
}
