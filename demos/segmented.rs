//! Example downloading one file in parallel segments.
//!
//! ```sh
//! cargo run --example segmented -- <url> [title] [segments]
//! ```

use color_eyre::{eyre::eyre, Result};
use segfetch::{CoordinatorBuilder, DownloadJob, JobOutcome, StyleOptions};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "https://httpbin.org/range/1048576".to_string());
    let url = reqwest::Url::parse(&url)?;
    let job = match args.next() {
        Some(title) => DownloadJob::titled(&url, "downloads", &title),
        None => DownloadJob::try_from(&url)?.in_directory("downloads"),
    };
    let job = match args.next() {
        Some(segments) => job.with_segments(segments.parse()?),
        None => job,
    };

    let coordinator = CoordinatorBuilder::new()
        .progress_bars(StyleOptions::default())
        .build();

    // Ctrl-C stops every outstanding segment.
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match coordinator.run_with_cancel(&job, cancel).await? {
        JobOutcome::MergeSucceeded { path, bytes } => {
            println!("Saved {} bytes to {}", bytes, path.display());
            Ok(())
        }
        JobOutcome::JobFailed { failures } => {
            for failure in &failures {
                eprintln!("{}", failure);
            }
            Err(eyre!("{} segment(s) failed", failures.len()))
        }
        JobOutcome::Cancelled => Err(eyre!("Download cancelled")),
    }
}
