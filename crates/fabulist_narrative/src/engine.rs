//! The engine facade: one method per top-level unit of work.

use crate::config::EngineConfig;
use crate::expander::OutlineExpander;
use crate::images::{ImageGenerator, ImageRegenerator};
use crate::outline::OutlineGenerator;
use crate::segment::SegmentRegenerator;
use fabulist_core::{Illustration, OutlineBrief, Segment, Story, StoryFormat, StoryPart};
use fabulist_error::{FabulistResult, StoryError};
use fabulist_interface::{FabulistDriver, ImageDriver};
use tracing::instrument;

/// Story orchestration over a text and an image collaborator.
///
/// Every method is an independent unit of work. Nothing is shared between
/// calls except the read-only configuration, so calls may run concurrently.
/// Dropping a returned future abandons its in-flight collaborator calls and
/// commits nothing: results are only ever returned by value.
///
/// # Examples
///
/// ```no_run
/// use fabulist_narrative::{EngineConfig, StoryEngine};
/// # use fabulist_interface::{FabulistDriver, ImageDriver};
/// # async fn run<D: FabulistDriver, I: ImageDriver>(text: D, images: I) -> Result<(), Box<dyn std::error::Error>> {
/// use fabulist_core::{OutlineBrief, StoryFormat};
///
/// let engine = StoryEngine::new(text, images, EngineConfig::load()?)?;
/// let brief = OutlineBrief::builder()
///     .genre("adventure")
///     .reading_level("grade 2")
///     .tone("playful")
///     .description("A puppy named Max searches for a lost bone.")
///     .speaker_count(2u32)
///     .format(StoryFormat::Visual { number_of_panels: 6 })
///     .build()?;
///
/// let parts = engine.generate_outline(&brief).await?;
/// let story = engine.generate_full_story(&parts, brief.format()).await?;
/// let panels = engine.generate_images(&story.segment_list(), "watercolor", 6).await?;
/// assert_eq!(panels.len(), 6);
/// # Ok(())
/// # }
/// ```
pub struct StoryEngine<D, I> {
    text: D,
    images: I,
    config: EngineConfig,
}

impl<D, I> StoryEngine<D, I>
where
    D: FabulistDriver,
    I: ImageDriver,
{
    /// Create an engine.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(text: D, images: I, config: EngineConfig) -> FabulistResult<Self> {
        config.validate()?;
        Ok(Self {
            text,
            images,
            config,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a beginning, middle and end outline from a brief.
    #[instrument(skip(self, brief))]
    pub async fn generate_outline(&self, brief: &OutlineBrief) -> FabulistResult<[StoryPart; 3]> {
        OutlineGenerator::new(&self.text, &self.config)
            .generate(brief)
            .await
            .map(|generated| generated.into_value())
    }

    /// Expand an outline into a globally numbered story.
    #[instrument(skip(self, parts, format))]
    pub async fn generate_full_story(
        &self,
        parts: &[StoryPart],
        format: &StoryFormat,
    ) -> FabulistResult<Story> {
        OutlineExpander::new(&self.text, &self.config)
            .expand(parts, format)
            .await
    }

    /// Regenerate one segment of `story` without touching any other.
    ///
    /// The returned segment has the target's number and speaker; apply it
    /// with [`Story::replace_segment`].
    #[instrument(skip(self, story, user_request, tone))]
    pub async fn regenerate_segment(
        &self,
        story: &Story,
        target_number: u32,
        user_request: &str,
        tone: Option<&str>,
    ) -> FabulistResult<Segment> {
        let target = story.segment(target_number).ok_or_else(|| {
            StoryError::caller_input(format!("no segment numbered {}", target_number))
        })?;
        let part = story.part(*target.part_kind()).ok_or_else(|| {
            StoryError::contract(format!(
                "segment {} belongs to a part missing from the story",
                target_number
            ))
        })?;

        SegmentRegenerator::new(&self.text, &self.config)
            .regenerate(&story.segment_list(), target_number, user_request, part, tone)
            .await
            .map(|generated| generated.into_value())
    }

    /// Generate exactly `number_of_panels` illustrations for `segments`.
    #[instrument(skip(self, segments))]
    pub async fn generate_images(
        &self,
        segments: &[Segment],
        art_style: &str,
        number_of_panels: u32,
    ) -> FabulistResult<Vec<Illustration>> {
        ImageGenerator::new(&self.text, &self.images, &self.config)
            .generate(segments, art_style, number_of_panels)
            .await
    }

    /// Regenerate one illustration from itself and a modification request.
    #[instrument(skip(self, original, user_request))]
    pub async fn regenerate_image(
        &self,
        original: &Illustration,
        user_request: &str,
    ) -> FabulistResult<Illustration> {
        ImageRegenerator::new(&self.images, &self.config)
            .regenerate(original, user_request)
            .await
            .map(|generated| generated.into_value())
    }
}
