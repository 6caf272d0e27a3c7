//! Tests for HTTP module functionality.

use reqwest::header::{HeaderMap, HeaderValue, RANGE, USER_AGENT};
use reqwest::StatusCode;
use segfetch::http::{create_http_client, HttpClientConfig};
use std::time::Duration;

mod common;
use common::helpers::*;
use common::server::RangeServer;

#[test]
fn test_http_config_with_custom_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("custom-test-agent"));
    let config = HttpClientConfig {
        retries: 2,
        headers: Some(headers),
        connect_timeout: Some(Duration::from_secs(1)),
        ..HttpClientConfig::default()
    };

    assert_eq!(config.retries, 2);
    assert_eq!(
        config.headers.as_ref().and_then(|h| h.get(USER_AGENT)),
        Some(&HeaderValue::from_static("custom-test-agent"))
    );
    assert!(create_http_client(config).is_ok());
}

#[tokio::test]
async fn test_client_sends_range_requests() {
    let content = create_test_content(256);
    let server = RangeServer::start(content.clone()).await;
    let client = create_test_client();

    let res = client
        .get(server.url("video.mp4"))
        .header(RANGE, "bytes=16-31")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(res.bytes().await.unwrap().as_ref(), &content[16..32]);
    assert_eq!(server.range_requests(), 1);
}

#[tokio::test]
async fn test_client_without_range_gets_whole_body() {
    let content = create_test_content(64);
    let server = RangeServer::start(content.clone()).await;

    let res = create_test_client()
        .get(server.url("video.mp4"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().as_ref(), content.as_slice());
    assert_eq!(server.range_requests(), 0);
}
