//! Error types for the Fabulist story engine.
//!
//! This crate provides the foundation error types used throughout the Fabulist workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Story generation failures use the taxonomy in [`StoryErrorKind`]. The
//! structural validator reports a [`Violation`], which the retry loop either
//! recovers from or converts into a terminal [`StoryError`].
//!
//! # Examples
//!
//! ```
//! use fabulist_error::{FabulistResult, StoryError, StoryErrorKind};
//!
//! fn check_speakers(count: u32) -> FabulistResult<()> {
//!     if !(1..=4).contains(&count) {
//!         Err(StoryError::new(StoryErrorKind::CallerInputError(format!(
//!             "speaker count {} outside [1, 4]",
//!             count
//!         ))))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_speakers(5).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod json;
mod provider;
mod story;
mod violation;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{FabulistError, FabulistErrorKind, FabulistResult};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use story::{StoryError, StoryErrorKind};
pub use violation::{Violation, ViolationKind};
