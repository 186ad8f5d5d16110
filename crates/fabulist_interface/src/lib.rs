//! Trait definitions for the generative collaborators Fabulist drives.
//!
//! The engine never talks to a model directly. It calls a text driver for
//! outlines, story parts, segment rewrites and scene plans, and an image
//! driver for panels and image edits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{FabulistDriver, ImageDriver};
