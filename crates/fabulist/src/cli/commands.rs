//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fabulist - children's story generation from a short brief
#[derive(Parser, Debug)]
#[command(name = "fabulist")]
#[command(about = "Children's story generation from a short brief", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Engine configuration file (defaults to the layered fabulist.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Text model identifier (overrides the config's text_model)
    #[arg(long, global = true, env = "FABULIST_TEXT_MODEL")]
    pub text_model: Option<String>,

    /// Image model identifier
    #[arg(long, global = true, env = "FABULIST_IMAGE_MODEL", default_value = "gpt-image-1")]
    pub image_model: String,

    /// Write the JSON result here instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a beginning, middle and end outline from a brief
    Outline {
        /// Path to the brief JSON file
        #[arg(long)]
        brief: PathBuf,
    },

    /// Generate a full numbered story
    Story {
        /// Path to the brief JSON file
        #[arg(long)]
        brief: PathBuf,

        /// Expand this outline instead of generating one
        #[arg(long)]
        outline: Option<PathBuf>,
    },

    /// Rewrite one segment of a story, leaving the rest untouched
    RegenerateSegment {
        /// Path to the story JSON file
        #[arg(long)]
        story: PathBuf,

        /// Global number of the segment to rewrite
        #[arg(long)]
        segment: u32,

        /// What to change
        #[arg(long)]
        request: String,

        /// Tone to keep while rewriting
        #[arg(long)]
        tone: Option<String>,
    },

    /// Illustrate a visual story
    Images {
        /// Path to the story JSON file
        #[arg(long)]
        story: PathBuf,

        /// Art style for every panel
        #[arg(long)]
        style: String,

        /// Number of panels (defaults to the story's format)
        #[arg(long)]
        panels: Option<u32>,
    },

    /// Modify one illustration
    RegenerateImage {
        /// Path to the illustration JSON file
        #[arg(long)]
        illustration: PathBuf,

        /// What to change
        #[arg(long)]
        request: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regenerate_segment() {
        let cli = Cli::try_parse_from([
            "fabulist",
            "regenerate-segment",
            "--story",
            "story.json",
            "--segment",
            "3",
            "--request",
            "make it funnier",
        ])
        .unwrap();

        match cli.command {
            Commands::RegenerateSegment {
                segment,
                request,
                tone,
                ..
            } => {
                assert_eq!(segment, 3);
                assert_eq!(request, "make it funnier");
                assert!(tone.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fabulist",
            "images",
            "--story",
            "story.json",
            "--style",
            "watercolor",
            "--verbose",
            "--text-model",
            "gpt-4.1",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.text_model.as_deref(), Some("gpt-4.1"));
        assert!(matches!(cli.command, Commands::Images { panels: None, .. }));
    }

    #[test]
    fn test_segment_number_must_be_numeric() {
        let result = Cli::try_parse_from([
            "fabulist",
            "regenerate-segment",
            "--story",
            "story.json",
            "--segment",
            "three",
            "--request",
            "x",
        ]);

        assert!(result.is_err());
    }
}
