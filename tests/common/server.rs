//! In-process HTTP/1.1 server serving byte ranges of a fixed body.
//!
//! Every connection handles exactly one request and is closed afterwards.
//! [`ServerOptions`] switch on misbehaviours used to exercise failure paths.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// How long stalled responses hang.
pub const STALL: Duration = Duration::from_secs(30);

/// Misbehaviours of the server.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Answer range requests with `200 OK` and the whole body.
    pub ignore_range: bool,
    /// Range starts whose body is cut in half while still announcing the full length.
    pub truncate_at: Vec<u64>,
    /// Range starts whose response never arrives.
    pub stall_at: Vec<u64>,
    /// Stall every range request.
    pub stall_all: bool,
    /// How long stalls last, [`STALL`] when unset.
    pub stall_for: Option<Duration>,
    /// Range starts whose body stops halfway and then hangs.
    pub hang_at: Vec<u64>,
    /// Serve and announce the range one byte later than requested.
    pub shift_range: bool,
    /// Bytes appended after every range body, counted in `Content-Length`.
    pub extra_bytes: usize,
    /// Leave `Content-Length` out of HEAD responses.
    pub omit_length: bool,
    /// Status code returned for HEAD requests.
    pub head_status: Option<u16>,
}

/// A running range server.
pub struct RangeServer {
    addr: SocketAddr,
    range_requests: Arc<AtomicUsize>,
    head_requests: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl RangeServer {
    /// Serve `body` without misbehaving.
    pub async fn start(body: Vec<u8>) -> Self {
        Self::start_with(body, ServerOptions::default()).await
    }

    /// Serve `body` with the given options.
    pub async fn start_with(body: Vec<u8>, options: ServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read server address");

        let body = Arc::new(body);
        let options = Arc::new(options);
        let range_requests = Arc::new(AtomicUsize::new(0));
        let head_requests = Arc::new(AtomicUsize::new(0));

        let handle = tokio::spawn({
            let range_requests = Arc::clone(&range_requests);
            let head_requests = Arc::clone(&head_requests);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let body = Arc::clone(&body);
                    let options = Arc::clone(&options);
                    let counters = (Arc::clone(&range_requests), Arc::clone(&head_requests));
                    tokio::spawn(async move {
                        let _ = serve(stream, &body, &options, counters).await;
                    });
                }
            }
        });

        Self {
            addr,
            range_requests,
            head_requests,
            handle,
        }
    }

    /// URL of `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Number of range requests received so far.
    pub fn range_requests(&self) -> usize {
        self.range_requests.load(Ordering::SeqCst)
    }

    /// Number of HEAD requests received so far.
    pub fn head_requests(&self) -> usize {
        self.head_requests.load(Ordering::SeqCst)
    }
}

impl Drop for RangeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    body: &[u8],
    options: &ServerOptions,
    (range_requests, head_requests): (Arc<AtomicUsize>, Arc<AtomicUsize>),
) -> std::io::Result<()> {
    let head = read_head(&mut stream).await?;
    let mut lines = head.lines();
    let method = lines
        .next()
        .and_then(|line| line.split_whitespace().next())
        .unwrap_or_default()
        .to_string();
    let total = body.len() as u64;
    let range = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("range"))
        .and_then(|(_, value)| parse_range(value.trim(), total));

    if method == "HEAD" {
        head_requests.fetch_add(1, Ordering::SeqCst);
        let status = options.head_status.unwrap_or(200);
        let mut response = format!(
            "HTTP/1.1 {} {}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n",
            status,
            reason(status)
        );
        if !options.omit_length {
            response.push_str(&format!("Content-Length: {}\r\n", total));
        }
        response.push_str("\r\n");
        stream.write_all(response.as_bytes()).await?;
        return stream.shutdown().await;
    }

    match range {
        Some((start, end)) if !options.ignore_range => {
            range_requests.fetch_add(1, Ordering::SeqCst);
            let stall = options.stall_for.unwrap_or(STALL);
            if options.stall_all || options.stall_at.contains(&start) {
                tokio::time::sleep(stall).await;
            }
            let requested = start;
            let (start, end) = match options.shift_range {
                true => (start + 1, (end + 1).min(total - 1)),
                false => (start, end),
            };
            let slice = &body[start as usize..=end as usize];
            let header = format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Range: bytes {}-{}/{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                start,
                end,
                total,
                slice.len() + options.extra_bytes
            );
            stream.write_all(header.as_bytes()).await?;
            if options.truncate_at.contains(&requested) {
                stream.write_all(&slice[..slice.len() / 2]).await?;
            } else if options.hang_at.contains(&requested) {
                stream.write_all(&slice[..slice.len() / 2]).await?;
                stream.flush().await?;
                tokio::time::sleep(stall).await;
            } else {
                stream.write_all(slice).await?;
                stream.write_all(&vec![0xAA; options.extra_bytes]).await?;
            }
        }
        _ => {
            if range.is_some() {
                range_requests.fetch_add(1, Ordering::SeqCst);
            }
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                total
            );
            stream.write_all(header.as_bytes()).await?;
            stream.write_all(body).await?;
        }
    }
    stream.flush().await?;
    stream.shutdown().await
}

/// Read the request line and headers.
async fn read_head(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < 64 * 1024 {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}

/// Parse `bytes=start-end` against a body of `total` bytes.
fn parse_range(value: &str, total: u64) -> Option<(u64, u64)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = match end.trim() {
        "" => total.checked_sub(1)?,
        end => end.parse::<u64>().ok()?.min(total.checked_sub(1)?),
    };
    (start <= end).then_some((start, end))
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
