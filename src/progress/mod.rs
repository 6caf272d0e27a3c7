//! Progress module containing the observer hooks and their terminal rendering.
//!
//! # Overview
//!
//! - `observer` - the [`ProgressObserver`] trait the engine reports to
//! - `display` - [`ProgressDisplay`], an `indicatif` based observer
//! - `style` - progress bar styling options and templates
//!
//! # Examples
//!
//! ```rust
//! use segfetch::coordinator::CoordinatorBuilder;
//! use segfetch::progress::{ProgressBarOpts, StyleOptions};
//!
//! let coordinator = CoordinatorBuilder::new()
//!     .progress_bars(StyleOptions::new(
//!         ProgressBarOpts::hidden(),
//!         ProgressBarOpts::with_pip_style(),
//!     ))
//!     .build();
//! ```

pub(crate) mod display;
pub(crate) mod observer;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use observer::ProgressObserver;
pub use style::{ProgressBarOpts, StyleOptions};
