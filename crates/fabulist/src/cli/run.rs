//! Command handlers.
//!
//! Each handler reads its JSON inputs, runs one engine operation and returns
//! the value to print.

use anyhow::{Context, anyhow};
use fabulist::{
    BriefRequest, EngineConfig, Illustration, JsonError, OpenAiDriver, OpenAiImageDriver,
    OutlineBrief, Story, StoryEngine, StoryPart,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Engine wired to the OpenAI-compatible drivers.
pub type Engine = StoryEngine<OpenAiDriver, OpenAiImageDriver>;

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| JsonError::new(format!("parsing {}: {}", path.display(), e)))?;
    Ok(value)
}

/// Briefs are read loosely and checked, so a bad length payload is a
/// caller input error rather than a parse failure.
fn read_brief(path: &Path) -> anyhow::Result<OutlineBrief> {
    let request: BriefRequest = read_json(path)?;
    Ok(OutlineBrief::from_request(request)?)
}

/// Text model used when neither the flag nor the config names one.
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";

/// Applies a `--text-model` override and picks the model the text driver
/// talks to.
fn resolve_text_model(config: EngineConfig, text_model: Option<&str>) -> (EngineConfig, String) {
    let config = match text_model {
        Some(model) => config.with_text_model(model),
        None => config,
    };
    let model = config
        .text_model()
        .clone()
        .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());
    (config, model)
}

/// Build the engine from the config file (or layered defaults) and the
/// environment.
#[instrument(skip_all, fields(image_model = %image_model))]
pub fn build_engine(
    config: Option<&PathBuf>,
    text_model: Option<&str>,
    image_model: &str,
) -> anyhow::Result<Engine> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load()?,
    };
    let (config, text_model) = resolve_text_model(config, text_model);
    info!(text_model = %text_model, "Resolved text model");
    let text = OpenAiDriver::new(text_model)?;
    let images = OpenAiImageDriver::new(image_model.to_string())?;
    Ok(StoryEngine::new(text, images, config)?)
}

/// Generate an outline from a brief file.
#[instrument(skip(engine))]
pub async fn generate_outline(engine: &Engine, brief: &Path) -> anyhow::Result<Vec<StoryPart>> {
    let brief = read_brief(brief)?;
    let parts = engine.generate_outline(&brief).await?;
    info!("Outline generated");
    Ok(parts.to_vec())
}

/// Generate a full story, from a given outline or a fresh one.
#[instrument(skip(engine))]
pub async fn generate_story(
    engine: &Engine,
    brief: &Path,
    outline: Option<&Path>,
) -> anyhow::Result<Story> {
    let brief = read_brief(brief)?;
    let parts = match outline {
        Some(path) => read_json::<Vec<StoryPart>>(path)?,
        None => engine.generate_outline(&brief).await?.to_vec(),
    };
    let story = engine.generate_full_story(&parts, brief.format()).await?;
    info!(
        sections = story.section_count(),
        segments = story.segment_count(),
        "Story generated"
    );
    Ok(story)
}

/// Rewrite one segment and return the updated story.
#[instrument(skip(engine, request))]
pub async fn regenerate_segment(
    engine: &Engine,
    story: &Path,
    segment: u32,
    request: &str,
    tone: Option<&str>,
) -> anyhow::Result<Story> {
    let mut story: Story = read_json(story)?;
    let replacement = engine
        .regenerate_segment(&story, segment, request, tone)
        .await?;
    story.replace_segment(replacement)?;
    info!(segment, "Segment regenerated");
    Ok(story)
}

/// Illustrate a story with a fixed number of panels.
#[instrument(skip(engine))]
pub async fn generate_images(
    engine: &Engine,
    story: &Path,
    style: &str,
    panels: Option<u32>,
) -> anyhow::Result<Vec<Illustration>> {
    let story: Story = read_json(story)?;
    let panels = panels
        .or_else(|| story.format().number_of_panels())
        .ok_or_else(|| anyhow!("story is not visual; pass --panels"))?;
    let illustrations = engine
        .generate_images(&story.segment_list(), style, panels)
        .await?;
    info!(panels = illustrations.len(), "Illustrations generated");
    Ok(illustrations)
}

/// Modify one illustration.
#[instrument(skip(engine, request))]
pub async fn regenerate_image(
    engine: &Engine,
    illustration: &Path,
    request: &str,
) -> anyhow::Result<Illustration> {
    let original: Illustration = read_json(illustration)?;
    let updated = engine.regenerate_image(&original, request).await?;
    info!(panel = *updated.panel_number(), "Illustration regenerated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabulist::{FabulistError, StoryErrorKind};
    use std::io::Write;

    fn brief_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_text_model_flag_overrides_config() {
        let config = EngineConfig::default().with_text_model("gpt-4.1");

        let (config, model) = resolve_text_model(config, Some("gpt-4o"));
        assert_eq!(model, "gpt-4o");
        assert_eq!(config.text_model().as_deref(), Some("gpt-4o"));

        let (config, model) = resolve_text_model(config, None);
        assert_eq!(model, "gpt-4o");
        assert_eq!(config.text_model().as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_text_model_falls_back_to_default() {
        let (config, model) = resolve_text_model(EngineConfig::default(), None);
        assert_eq!(model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.text_model(), &None);
    }

    #[test]
    fn test_visual_brief_without_panels_is_caller_input() {
        let file = brief_file(
            r#"{"genre": "adventure", "reading_level": "grade 2", "tone": "playful",
                "description": "A puppy searches for a bone.", "speaker_count": 2,
                "story_type": "visual"}"#,
        );

        let err = read_brief(file.path()).unwrap_err();
        let err = err.downcast_ref::<FabulistError>().unwrap();
        assert!(matches!(
            err.as_story().map(|e| &e.kind),
            Some(StoryErrorKind::CallerInputError(_))
        ));
    }

    #[test]
    fn test_broken_json_is_json_error() {
        let file = brief_file("{ not json");

        let err = read_brief(file.path()).unwrap_err();
        assert!(err.downcast_ref::<JsonError>().is_some());
    }
}
