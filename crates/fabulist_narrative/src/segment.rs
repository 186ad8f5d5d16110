//! Targeted regeneration of a single segment.

use crate::call::call_text;
use crate::config::EngineConfig;
use crate::prompts::segment_request;
use crate::retry::{Generated, RetryingGenerator};
use crate::validator::validate_segment_output;
use fabulist_core::{GenerationConstraints, GenerationKind, Segment, StoryPart};
use fabulist_error::{FabulistResult, StoryError};
use fabulist_interface::FabulistDriver;
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Rewrites one segment's content using the whole story as context.
///
/// The replacement keeps the original's number, section and speaker. A
/// reply that changes speaker or number is a contract breach and fails
/// immediately; other defects are retried within budget.
pub struct SegmentRegenerator<'a, D: ?Sized> {
    driver: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D> SegmentRegenerator<'a, D>
where
    D: FabulistDriver + ?Sized,
{
    /// Create a regenerator over a text collaborator.
    pub fn new(driver: &'a D, config: &'a EngineConfig) -> Self {
        Self { driver, config }
    }

    /// Produce a replacement for segment `target_number`.
    ///
    /// `segments` is not modified. Apply the result with
    /// [`Story::replace_segment`](fabulist_core::Story::replace_segment).
    ///
    /// # Errors
    ///
    /// - `CallerInputError` if the target is missing, the request is blank,
    ///   or `part` does not own the target
    /// - `ContractViolation` if `segments` repeats a number, or the model
    ///   changes the speaker or number
    /// - `GenerationExhausted` when no valid replacement is produced in budget
    #[instrument(skip(self, segments, user_request, part, tone), fields(segments = segments.len()))]
    pub async fn regenerate(
        &self,
        segments: &[Segment],
        target_number: u32,
        user_request: &str,
        part: &StoryPart,
        tone: Option<&str>,
    ) -> FabulistResult<Generated<Segment>> {
        let original = find_target(segments, target_number)?;
        if user_request.trim().is_empty() {
            return Err(StoryError::caller_input("regeneration request must not be empty").into());
        }
        if original.part_kind() != part.part_kind() {
            return Err(StoryError::caller_input(format!(
                "segment {} belongs to the {} part, not {}",
                target_number,
                original.part_kind(),
                part.part_kind()
            ))
            .into());
        }

        let constraints = GenerationConstraints::new(
            GenerationKind::Segment,
            self.config.attempts_for(GenerationKind::Segment),
        )
        .with_speakers(part.declared_speakers().iter().cloned())
        .with_max_speakers(*self.config.max_speakers());
        let generator = RetryingGenerator::from_constraints(&constraints)?
            .with_feedback(*self.config.feedback_on_retry());

        let generated = generator
            .run(
                |hint| {
                    let request = segment_request(
                        self.config,
                        segments,
                        original,
                        user_request,
                        part,
                        tone,
                        hint.as_ref(),
                    );
                    async move { call_text(self.driver, &request, self.config.text_timeout()).await }
                },
                |raw| validate_segment_output(&raw, original),
            )
            .await?;

        info!(attempts = generated.attempts(), "Segment regenerated");
        Ok(generated)
    }
}

/// The target segment, after checking the list numbers each segment once.
#[track_caller]
fn find_target(segments: &[Segment], target_number: u32) -> FabulistResult<&Segment> {
    let mut seen = BTreeSet::new();
    for segment in segments {
        if !seen.insert(*segment.segment_number()) {
            return Err(StoryError::contract(format!(
                "segment number {} appears more than once",
                segment.segment_number()
            ))
            .into());
        }
    }
    segments
        .iter()
        .find(|segment| *segment.segment_number() == target_number)
        .ok_or_else(|| {
            StoryError::caller_input(format!("no segment numbered {}", target_number)).into()
        })
}
