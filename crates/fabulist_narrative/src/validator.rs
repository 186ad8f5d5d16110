//! Structural validation of collaborator output.
//!
//! Every function here is pure: raw reply text plus constraints in, parsed
//! value or the first [`Violation`] out. The violation's kind decides whether
//! the retry loop tries again or fails fast.

use crate::extraction::parse_reply;
use crate::config::MAX_SPEAKERS;
use fabulist_core::{GenerationConstraints, GenerationKind, Illustration, PartKind, Segment, StoryPart};
use fabulist_error::{FabulistResult, StoryError, Violation, ViolationKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One segment as drafted by the model, before numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSegment {
    /// Speaker name
    pub speaker: String,
    /// Spoken or narrated content
    pub content: String,
}

/// One section as drafted by the model, before numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSection {
    /// Segments in order
    pub segments: Vec<DraftSegment>,
}

/// The model's expansion of one outline part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPart {
    /// Sections in order
    pub sections: Vec<DraftSection>,
}

impl DraftPart {
    fn segments(&self) -> impl Iterator<Item = &DraftSegment> {
        self.sections.iter().flat_map(|section| section.segments.iter())
    }
}

#[derive(Debug, Deserialize)]
struct OutlineReply {
    parts: Vec<OutlinePartReply>,
}

#[derive(Debug, Deserialize)]
struct OutlinePartReply {
    part_kind: PartKind,
    summary: String,
    declared_speakers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScenePlanReply {
    scenes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SegmentReply {
    #[serde(default)]
    segment_number: Option<u32>,
    speaker: String,
    content: String,
}

/// Reject constraints that no amount of retrying could satisfy.
///
/// # Errors
///
/// Returns an `InvalidConstraint` violation describing the bad constraint.
pub fn check_constraints(constraints: &GenerationConstraints) -> Result<(), Violation> {
    let invalid = |detail: String| Err(Violation::new(ViolationKind::InvalidConstraint, detail));

    if *constraints.max_attempts() == 0 {
        return invalid(format!("{} request has a zero attempt budget", constraints.kind()));
    }
    if !(1..=MAX_SPEAKERS).contains(constraints.max_speakers()) {
        return invalid(format!(
            "max speakers {} outside [1, {}]",
            constraints.max_speakers(),
            MAX_SPEAKERS
        ));
    }
    match constraints.kind() {
        GenerationKind::StoryPart | GenerationKind::Segment
            if constraints.declared_speakers().is_empty() =>
        {
            invalid(format!("{} request declares no speakers", constraints.kind()))
        }
        GenerationKind::ScenePlan if constraints.expected_panels().is_none() => {
            invalid("scene plan request has no panel count".to_string())
        }
        _ if *constraints.expected_panels() == Some(0) => {
            invalid("panel count must be at least 1".to_string())
        }
        _ => Ok(()),
    }
}

/// Validate the model's expansion of one outline part.
///
/// Checks, stopping at the first failure: the reply parses into sections of
/// segments with no empty levels, every speaker is declared, and the number
/// of distinct speakers used is within `[1, max_speakers]`.
///
/// # Errors
///
/// Returns the first violation found.
///
/// # Examples
///
/// ```
/// use fabulist_core::{GenerationConstraints, GenerationKind};
/// use fabulist_error::ViolationKind;
/// use fabulist_narrative::validate_story_output;
///
/// let constraints = GenerationConstraints::new(GenerationKind::StoryPart, 3)
///     .with_speakers(["Narrator", "Max"]);
///
/// let ok = r#"{"sections":[{"segments":[{"speaker":"Max","content":"Woof!"}]}]}"#;
/// assert_eq!(validate_story_output(ok, &constraints).unwrap().sections.len(), 1);
///
/// let stray = r#"{"sections":[{"segments":[{"speaker":"Luna","content":"Meow."}]}]}"#;
/// let violation = validate_story_output(stray, &constraints).unwrap_err();
/// assert_eq!(violation.kind, ViolationKind::SpeakerOutsideDeclared);
/// ```
pub fn validate_story_output(
    raw: &str,
    constraints: &GenerationConstraints,
) -> Result<DraftPart, Violation> {
    let mut draft: DraftPart = parse_reply(raw)?;

    if draft.sections.is_empty() {
        return Err(Violation::new(
            ViolationKind::EmptyStructure,
            "reply contains no sections; produce at least one section",
        ));
    }
    for (index, section) in draft.sections.iter_mut().enumerate() {
        if section.segments.is_empty() {
            return Err(Violation::new(
                ViolationKind::EmptyStructure,
                format!("section {} contains no segments", index + 1),
            ));
        }
        for segment in section.segments.iter_mut() {
            segment.speaker = segment.speaker.trim().to_string();
            if segment.content.trim().is_empty() {
                return Err(Violation::new(
                    ViolationKind::EmptyStructure,
                    format!("a segment by '{}' has no content", segment.speaker),
                ));
            }
        }
    }

    if let Some(stray) = draft
        .segments()
        .find(|segment| !constraints.allows_speaker(&segment.speaker))
    {
        return Err(Violation::new(
            ViolationKind::SpeakerOutsideDeclared,
            format!(
                "speaker '{}' is not one of the declared speakers [{}]",
                stray.speaker,
                join(constraints.declared_speakers())
            ),
        ));
    }

    let used: BTreeSet<&str> = draft.segments().map(|s| s.speaker.as_str()).collect();
    if used.is_empty() || used.len() as u32 > *constraints.max_speakers() {
        return Err(Violation::new(
            ViolationKind::SpeakerCountOutOfRange,
            format!(
                "{} distinct speakers used; allowed range is [1, {}]",
                used.len(),
                constraints.max_speakers()
            ),
        ));
    }

    Ok(draft)
}

/// Validate a three-part outline reply.
///
/// Expects `{"parts": [{"part_kind", "summary", "declared_speakers"}, ...]}`
/// with exactly the beginning, middle and end parts in that order.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_outline_output(
    raw: &str,
    constraints: &GenerationConstraints,
) -> Result<[StoryPart; 3], Violation> {
    let reply: OutlineReply = parse_reply(raw)?;

    if reply.parts.len() != PartKind::ORDER.len() {
        return Err(Violation::new(
            ViolationKind::EmptyStructure,
            format!(
                "outline has {} parts; exactly 3 are required (beginning, middle, end)",
                reply.parts.len()
            ),
        ));
    }

    let mut all_speakers = BTreeSet::new();
    let mut parts = Vec::with_capacity(3);
    for (expected, part) in PartKind::ORDER.iter().zip(reply.parts) {
        if part.part_kind != *expected {
            return Err(Violation::malformed(format!(
                "found part '{}' where '{}' was expected; order must be beginning, middle, end",
                part.part_kind, expected
            )));
        }
        if part.summary.trim().is_empty() {
            return Err(Violation::new(
                ViolationKind::EmptyStructure,
                format!("the {} part has an empty summary", expected),
            ));
        }
        let speakers: BTreeSet<String> = part
            .declared_speakers
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if speakers.is_empty() {
            return Err(Violation::new(
                ViolationKind::EmptyStructure,
                format!("the {} part declares no speakers", expected),
            ));
        }
        all_speakers.extend(speakers.iter().cloned());
        parts.push(StoryPart::new(*expected, part.summary.trim(), speakers));
    }

    if all_speakers.len() as u32 > *constraints.max_speakers() {
        return Err(Violation::new(
            ViolationKind::SpeakerCountOutOfRange,
            format!(
                "outline uses {} distinct speakers [{}]; at most {} are allowed",
                all_speakers.len(),
                join(&all_speakers),
                constraints.max_speakers()
            ),
        ));
    }

    parts
        .try_into()
        .map_err(|_| Violation::malformed("outline did not contain three parts"))
}

/// Validate a scene plan: exactly one non-empty scene per requested panel.
///
/// # Errors
///
/// Returns `PanelCountMismatch` when the count is off by any amount.
pub fn validate_scene_output(
    raw: &str,
    constraints: &GenerationConstraints,
) -> Result<Vec<String>, Violation> {
    let reply: ScenePlanReply = parse_reply(raw)?;
    let expected = constraints.expected_panels().unwrap_or_default();

    if reply.scenes.len() as u32 != expected {
        return Err(Violation::new(
            ViolationKind::PanelCountMismatch,
            format!(
                "expected exactly {} scenes, got {}",
                expected,
                reply.scenes.len()
            ),
        ));
    }
    if let Some(index) = reply.scenes.iter().position(|s| s.trim().is_empty()) {
        return Err(Violation::new(
            ViolationKind::EmptyStructure,
            format!("scene {} is empty", index + 1),
        ));
    }

    Ok(reply.scenes.into_iter().map(|s| s.trim().to_string()).collect())
}

/// Validate a regenerated segment against the one it replaces.
///
/// Number and speaker drift are contract breaches and are not retried.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_segment_output(raw: &str, original: &Segment) -> Result<Segment, Violation> {
    let reply: SegmentReply = parse_reply(raw)?;

    if let Some(number) = reply.segment_number
        && number != *original.segment_number()
    {
        return Err(Violation::new(
            ViolationKind::NumberDrift,
            format!(
                "regenerated segment reports number {} instead of {}",
                number,
                original.segment_number()
            ),
        ));
    }
    let speaker = reply.speaker.trim();
    if speaker != original.speaker() {
        return Err(Violation::new(
            ViolationKind::SpeakerDrift,
            format!(
                "regenerated segment {} changed speaker from '{}' to '{}'",
                original.segment_number(),
                original.speaker(),
                speaker
            ),
        ));
    }
    if reply.content.trim().is_empty() {
        return Err(Violation::new(
            ViolationKind::EmptyStructure,
            "regenerated segment has no content",
        ));
    }

    Ok(original.with_content(reply.content.trim()))
}

/// Final check on a completed illustration batch.
///
/// # Errors
///
/// Returns `ContractViolation` unless there are exactly `expected` illustrations
/// numbered `1..=expected` in order.
#[track_caller]
pub fn verify_illustrations(illustrations: &[Illustration], expected: u32) -> FabulistResult<()> {
    if illustrations.len() as u32 != expected {
        return Err(StoryError::contract(format!(
            "{} illustrations produced for {} panels",
            illustrations.len(),
            expected
        ))
        .into());
    }
    for (index, illustration) in illustrations.iter().enumerate() {
        let panel = index as u32 + 1;
        if *illustration.panel_number() != panel {
            return Err(StoryError::contract(format!(
                "illustration for panel {} found in slot {}",
                illustration.panel_number(),
                panel
            ))
            .into());
        }
    }
    Ok(())
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
