//! Expansion of a three-part outline into a globally numbered story.
//!
//! Parts are processed strictly in order. Each part's draft is validated
//! before its sections are numbered, and the counters carry on from the
//! previous part. Any failure aborts the whole expansion.

use crate::call::call_text;
use crate::config::EngineConfig;
use crate::numbering::NumberingCounter;
use crate::prompts::{length_targets, story_part_request, LengthTarget};
use crate::retry::RetryingGenerator;
use crate::validator::validate_story_output;
use fabulist_core::{
    GenerationConstraints, GenerationKind, PartKind, Section, Story, StoryFormat, StoryPart,
};
use fabulist_error::{FabulistResult, StoryError};
use fabulist_interface::FabulistDriver;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Expands outline parts into sections and segments.
pub struct OutlineExpander<'a, D: ?Sized> {
    driver: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D> OutlineExpander<'a, D>
where
    D: FabulistDriver + ?Sized,
{
    /// Create an expander over a text collaborator.
    pub fn new(driver: &'a D, config: &'a EngineConfig) -> Self {
        Self { driver, config }
    }

    /// Expand `parts` into a complete, verified story.
    ///
    /// # Errors
    ///
    /// - `CallerInputError` if the parts are not exactly beginning, middle
    ///   and end with summaries and declared speakers, or the format is empty
    /// - `GenerationExhausted` if any part runs out of attempts
    /// - `ContractViolation` if the assembled story fails verification
    #[instrument(skip(self, parts), fields(parts = parts.len(), story_type = %format.story_type()))]
    pub async fn expand(&self, parts: &[StoryPart], format: &StoryFormat) -> FabulistResult<Story> {
        check_parts(parts, *self.config.max_speakers())?;
        format.validate()?;

        let targets = length_targets(format, *self.config.words_per_minute());
        let mut counter = NumberingCounter::new();
        let mut sections: Vec<Section> = Vec::new();

        for (part, target) in parts.iter().zip(targets) {
            let accepted = self
                .expand_part(parts, part, target, &sections, &mut counter)
                .await?;
            sections.extend(accepted);
        }

        let story = Story::new(parts.to_vec(), *format, sections);
        story.verify()?;

        info!(
            sections = story.section_count(),
            segments = story.segment_count(),
            "Story expanded"
        );
        Ok(story)
    }

    /// Generate, validate and number one part.
    #[instrument(skip(self, parts, part, story_so_far, counter), fields(part = %part.part_kind(), target = %target))]
    async fn expand_part(
        &self,
        parts: &[StoryPart],
        part: &StoryPart,
        target: LengthTarget,
        story_so_far: &[Section],
        counter: &mut NumberingCounter,
    ) -> FabulistResult<Vec<Section>> {
        let constraints = GenerationConstraints::new(
            GenerationKind::StoryPart,
            self.config.attempts_for(GenerationKind::StoryPart),
        )
        .with_speakers(part.declared_speakers().iter().cloned())
        .with_max_speakers(*self.config.max_speakers());
        let generator = RetryingGenerator::from_constraints(&constraints)?
            .with_feedback(*self.config.feedback_on_retry());

        let generated = generator
            .run(
                |hint| {
                    let request = story_part_request(
                        self.config,
                        parts,
                        part,
                        target,
                        story_so_far,
                        hint.as_ref(),
                    );
                    async move { call_text(self.driver, &request, self.config.text_timeout()).await }
                },
                |raw| validate_story_output(&raw, &constraints),
            )
            .await?;

        let attempts = *generated.attempts();
        let sections = counter.assign(*part.part_kind(), generated.into_value());
        debug!(
            attempts,
            sections = sections.len(),
            sections_issued = counter.sections_issued(),
            segments_issued = counter.segments_issued(),
            "Part accepted"
        );
        Ok(sections)
    }
}

/// Reject outlines that can never be expanded.
#[track_caller]
fn check_parts(parts: &[StoryPart], max_speakers: u32) -> FabulistResult<()> {
    if parts.len() != PartKind::ORDER.len() {
        return Err(StoryError::caller_input(format!(
            "exactly 3 outline parts are required, got {}",
            parts.len()
        ))
        .into());
    }
    let mut all_speakers = BTreeSet::new();
    for (expected, part) in PartKind::ORDER.iter().zip(parts) {
        if part.part_kind() != expected {
            return Err(StoryError::caller_input(format!(
                "outline part '{}' found where '{}' was expected",
                part.part_kind(),
                expected
            ))
            .into());
        }
        if part.summary().trim().is_empty() {
            return Err(
                StoryError::caller_input(format!("the {} part has no summary", expected)).into(),
            );
        }
        if part.declared_speakers().is_empty() {
            return Err(StoryError::caller_input(format!(
                "the {} part declares no speakers",
                expected
            ))
            .into());
        }
        all_speakers.extend(part.declared_speakers().iter());
    }
    if all_speakers.len() as u32 > max_speakers {
        return Err(StoryError::caller_input(format!(
            "outline declares {} speakers; at most {} are allowed",
            all_speakers.len(),
            max_speakers
        ))
        .into());
    }
    Ok(())
}
