//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fabulist binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{
    build_engine, generate_images, generate_outline, generate_story, regenerate_image,
    regenerate_segment,
};
