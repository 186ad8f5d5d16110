//! Three-part outline generation from a creative brief.

use crate::call::call_text;
use crate::config::EngineConfig;
use crate::prompts::outline_request;
use crate::retry::{Generated, RetryingGenerator};
use crate::validator::validate_outline_output;
use fabulist_core::{GenerationConstraints, GenerationKind, OutlineBrief, StoryPart};
use fabulist_error::{FabulistResult, StoryError};
use fabulist_interface::FabulistDriver;
use tracing::{info, instrument};

/// Produces the beginning, middle and end parts of a story.
pub struct OutlineGenerator<'a, D: ?Sized> {
    driver: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D> OutlineGenerator<'a, D>
where
    D: FabulistDriver + ?Sized,
{
    /// Create a generator over a text collaborator.
    pub fn new(driver: &'a D, config: &'a EngineConfig) -> Self {
        Self { driver, config }
    }

    /// Generate a validated outline.
    ///
    /// The brief is checked before any collaborator call.
    ///
    /// # Errors
    ///
    /// - `CallerInputError` for a speaker count outside `[1, max_speakers]`,
    ///   an empty description, or a zero-length format
    /// - `GenerationExhausted` when no valid outline is produced in budget
    #[instrument(skip(self, brief), fields(genre = %brief.genre(), speaker_count = brief.speaker_count(), story_type = %brief.format().story_type()))]
    pub async fn generate(&self, brief: &OutlineBrief) -> FabulistResult<Generated<[StoryPart; 3]>> {
        check_brief(brief, *self.config.max_speakers())?;

        let constraints =
            GenerationConstraints::new(GenerationKind::Outline, self.config.attempts_for(GenerationKind::Outline))
                .with_max_speakers(*brief.speaker_count());
        let generator = RetryingGenerator::from_constraints(&constraints)?
            .with_feedback(*self.config.feedback_on_retry());

        let generated = generator
            .run(
                |hint| {
                    let request = outline_request(self.config, brief, hint.as_ref());
                    async move { call_text(self.driver, &request, self.config.text_timeout()).await }
                },
                |raw| validate_outline_output(&raw, &constraints),
            )
            .await?;

        info!(attempts = generated.attempts(), "Outline generated");
        Ok(generated)
    }
}

#[track_caller]
fn check_brief(brief: &OutlineBrief, max_speakers: u32) -> FabulistResult<()> {
    let speakers = *brief.speaker_count();
    if !(1..=max_speakers).contains(&speakers) {
        return Err(StoryError::caller_input(format!(
            "number of speakers must be in [1, {}], got {}",
            max_speakers, speakers
        ))
        .into());
    }
    if brief.description().trim().is_empty() {
        return Err(StoryError::caller_input("story description must not be empty").into());
    }
    brief.format().validate()
}
