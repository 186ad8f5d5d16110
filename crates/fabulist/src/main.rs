//! Fabulist CLI binary.
//!
//! This binary provides command-line access to the story engine:
//! - Generate outlines and full stories from a brief
//! - Rewrite single segments
//! - Illustrate visual stories and modify single panels
//!
//! Inputs and outputs are JSON. Credentials come from `FABULIST_API_KEY`,
//! optionally loaded from a `.env` file.

use clap::Parser;
use fabulist::JsonError;
use fabulist::observability::{ObservabilityConfig, init_observability_with_config};
use serde::Serialize;
use std::path::Path;

mod cli;

fn write_output<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("serializing output: {}", e)))?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{
        Cli, Commands, build_engine, generate_images, generate_outline, generate_story,
        regenerate_image, regenerate_segment,
    };

    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability_with_config(
        ObservabilityConfig::default()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    let engine = build_engine(cli.config.as_ref(), cli.text_model.as_deref(), &cli.image_model)?;
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Outline { brief } => {
            write_output(&generate_outline(&engine, &brief).await?, output)?;
        }

        Commands::Story { brief, outline } => {
            let story = generate_story(&engine, &brief, outline.as_deref()).await?;
            write_output(&story, output)?;
        }

        Commands::RegenerateSegment {
            story,
            segment,
            request,
            tone,
        } => {
            let story =
                regenerate_segment(&engine, &story, segment, &request, tone.as_deref()).await?;
            write_output(&story, output)?;
        }

        Commands::Images {
            story,
            style,
            panels,
        } => {
            let illustrations = generate_images(&engine, &story, &style, panels).await?;
            write_output(&illustrations, output)?;
        }

        Commands::RegenerateImage {
            illustration,
            request,
        } => {
            write_output(&regenerate_image(&engine, &illustration, &request).await?, output)?;
        }
    }

    Ok(())
}
