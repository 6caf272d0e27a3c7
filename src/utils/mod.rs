//! Shared utility functions.
//!
//! This module contains helpers used by several parts of the crate. It
//! currently holds [`content_length`], which reads resource sizes out of HTTP
//! headers and probes a URL for its size.
//!
//! # Examples
//!
//! ```rust
//! use segfetch::utils::parse_content_range_total;
//!
//! let header_value = "bytes 0-1023/2048";
//! if let Some(total_size) = parse_content_range_total(header_value) {
//!     println!("Total file size: {} bytes", total_size);
//! }
//! ```

pub mod content_length;

pub use content_length::{
    content_length_from_headers, parse_content_range, parse_content_range_total,
    probe_content_length,
};
