//! Globally numbered sections and segments.

use crate::{PartKind, StoryFormat, StoryPart};
use derive_getters::Getters;
use fabulist_error::{FabulistResult, StoryError};
use serde::{Deserialize, Serialize};

/// Smallest narrative unit: one speaker's contiguous content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Segment {
    /// Global segment number, starting at 1
    segment_number: u32,
    /// Number of the owning section
    section_number: u32,
    /// Part the owning section belongs to
    part_kind: PartKind,
    /// Who speaks this segment
    speaker: String,
    /// What is said or narrated
    content: String,
}

impl Segment {
    /// Create a segment.
    pub fn new(
        segment_number: u32,
        section_number: u32,
        part_kind: PartKind,
        speaker: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            segment_number,
            section_number,
            part_kind,
            speaker: speaker.into(),
            content: content.into(),
        }
    }

    /// Same number, section and speaker with new content.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }
}

/// A numbered group of one or more segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Section {
    /// Global section number, starting at 1
    section_number: u32,
    /// Owning part
    part_kind: PartKind,
    /// Segments in order
    segments: Vec<Segment>,
}

impl Section {
    /// Create a section.
    pub fn new(section_number: u32, part_kind: PartKind, segments: Vec<Segment>) -> Self {
        Self {
            section_number,
            part_kind,
            segments,
        }
    }
}

/// A fully expanded story: the outline it came from and its numbered sections.
///
/// # Examples
///
/// ```
/// use fabulist_core::{PartKind, Section, Segment, Story, StoryFormat, StoryPart};
///
/// let parts = PartKind::ORDER
///     .iter()
///     .map(|kind| StoryPart::new(*kind, "summary", ["Narrator"]))
///     .collect();
/// let sections = vec![
///     Section::new(1, PartKind::Beginning, vec![Segment::new(1, 1, PartKind::Beginning, "Narrator", "Once.")]),
///     Section::new(2, PartKind::Middle, vec![Segment::new(2, 2, PartKind::Middle, "Narrator", "Then.")]),
///     Section::new(3, PartKind::End, vec![Segment::new(3, 3, PartKind::End, "Narrator", "Finally.")]),
/// ];
/// let story = Story::new(parts, StoryFormat::Audio { audio_length: 3 }, sections);
///
/// assert!(story.verify().is_ok());
/// assert_eq!(story.segment_count(), 3);
/// assert_eq!(story.segment(2).map(|s| s.content().as_str()), Some("Then."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Story {
    /// Outline parts in order
    parts: Vec<StoryPart>,
    /// Length budget the story was expanded under
    format: StoryFormat,
    /// Numbered sections in order
    sections: Vec<Section>,
}

impl Story {
    /// Assemble a story. Use [`Story::verify`] to check its invariants.
    pub fn new(parts: Vec<StoryPart>, format: StoryFormat, sections: Vec<Section>) -> Self {
        Self {
            parts,
            format,
            sections,
        }
    }

    /// All segments in number order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.sections.iter().flat_map(|section| section.segments.iter())
    }

    /// Owned copy of every segment, for passing as context.
    pub fn segment_list(&self) -> Vec<Segment> {
        self.segments().cloned().collect()
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Look up a segment by its global number.
    pub fn segment(&self, segment_number: u32) -> Option<&Segment> {
        self.segments()
            .find(|segment| segment.segment_number == segment_number)
    }

    /// Look up an outline part.
    pub fn part(&self, part_kind: PartKind) -> Option<&StoryPart> {
        self.parts.iter().find(|part| part.part_kind() == &part_kind)
    }

    /// Check the structural invariants of a completed story.
    ///
    /// Section numbers must be exactly `1..=M` in order, segment numbers
    /// exactly `1..=K` in order, every segment must point at its owning
    /// section and part, and every speaker must be declared by that part.
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` naming the first broken invariant.
    #[track_caller]
    pub fn verify(&self) -> FabulistResult<()> {
        let mut expected_segment = 1u32;
        for (index, section) in self.sections.iter().enumerate() {
            let expected_section = index as u32 + 1;
            if section.section_number != expected_section {
                return Err(StoryError::contract(format!(
                    "section number {} found where {} was expected",
                    section.section_number, expected_section
                ))
                .into());
            }
            if section.segments.is_empty() {
                return Err(StoryError::contract(format!(
                    "section {} has no segments",
                    section.section_number
                ))
                .into());
            }
            let part = self.part(section.part_kind).ok_or_else(|| {
                StoryError::contract(format!(
                    "section {} belongs to missing part {}",
                    section.section_number, section.part_kind
                ))
            })?;
            for segment in &section.segments {
                if segment.segment_number != expected_segment {
                    return Err(StoryError::contract(format!(
                        "segment number {} found where {} was expected",
                        segment.segment_number, expected_segment
                    ))
                    .into());
                }
                if segment.section_number != section.section_number
                    || segment.part_kind != section.part_kind
                {
                    return Err(StoryError::contract(format!(
                        "segment {} is not attached to its owning section {}",
                        segment.segment_number, section.section_number
                    ))
                    .into());
                }
                if !part.declares(&segment.speaker) {
                    return Err(StoryError::contract(format!(
                        "segment {} speaker '{}' is not declared for the {} part",
                        segment.segment_number, segment.speaker, section.part_kind
                    ))
                    .into());
                }
                expected_segment += 1;
            }
        }
        Ok(())
    }

    /// Replace one segment in place with a regenerated version.
    ///
    /// Only the content may change; number, section, part and speaker must
    /// match the segment being replaced. No other segment is touched.
    ///
    /// # Errors
    ///
    /// Returns `CallerInputError` if no segment has that number and
    /// `ContractViolation` if the replacement changes anything but content.
    #[track_caller]
    pub fn replace_segment(&mut self, replacement: Segment) -> FabulistResult<()> {
        let slot = self
            .sections
            .iter_mut()
            .flat_map(|section| section.segments.iter_mut())
            .find(|segment| segment.segment_number == replacement.segment_number)
            .ok_or_else(|| {
                StoryError::caller_input(format!(
                    "no segment numbered {}",
                    replacement.segment_number
                ))
            })?;

        if slot.speaker != replacement.speaker {
            return Err(StoryError::contract(format!(
                "replacement for segment {} changes speaker from '{}' to '{}'",
                slot.segment_number, slot.speaker, replacement.speaker
            ))
            .into());
        }
        if slot.section_number != replacement.section_number
            || slot.part_kind != replacement.part_kind
        {
            return Err(StoryError::contract(format!(
                "replacement for segment {} moves it to another section",
                slot.segment_number
            ))
            .into());
        }

        *slot = replacement;
        Ok(())
    }
}
