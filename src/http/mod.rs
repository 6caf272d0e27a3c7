//! HTTP module containing HTTP client functionality.
//!
//! This module provides the middleware-wrapped client (retries, tracing, proxy,
//! default headers) used for the size probe and for every range request.
//!
//! # Examples
//!
//! ```rust
//! use segfetch::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{create_http_client, HttpClientConfig};
