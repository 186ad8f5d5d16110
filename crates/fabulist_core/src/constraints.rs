//! Constraints attached to a single generation request.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kinds of generation request, each with its own attempt budget.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationKind {
    /// Three-part outline from a brief
    Outline,
    /// Sections and segments for one outline part
    StoryPart,
    /// Replacement content for one segment
    Segment,
    /// One scene description per requested panel
    ScenePlan,
    /// One panel image
    PanelImage,
    /// One modified image from a reference
    ImageEdit,
}

/// Constraints a generation attempt is validated against.
///
/// # Examples
///
/// ```
/// use fabulist_core::{GenerationConstraints, GenerationKind};
///
/// let constraints = GenerationConstraints::new(GenerationKind::StoryPart, 3)
///     .with_speakers(["Narrator", "Max"])
///     .with_max_speakers(4);
///
/// assert!(constraints.allows_speaker("Max"));
/// assert_eq!(*constraints.expected_panels(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerationConstraints {
    /// Request kind
    kind: GenerationKind,
    /// Speakers segments may use
    declared_speakers: BTreeSet<String>,
    /// Upper bound on distinct speakers actually used
    max_speakers: u32,
    /// Exact number of panels/scenes required, for visual requests
    expected_panels: Option<u32>,
    /// Attempt budget
    max_attempts: u32,
}

impl GenerationConstraints {
    /// Constraints with no speaker or panel requirements.
    pub fn new(kind: GenerationKind, max_attempts: u32) -> Self {
        Self {
            kind,
            declared_speakers: BTreeSet::new(),
            max_speakers: 4,
            expected_panels: None,
            max_attempts,
        }
    }

    /// Builder method to set the declared speakers.
    pub fn with_speakers<S: Into<String>>(mut self, speakers: impl IntoIterator<Item = S>) -> Self {
        self.declared_speakers = speakers.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the speaker ceiling.
    pub fn with_max_speakers(mut self, max_speakers: u32) -> Self {
        self.max_speakers = max_speakers;
        self
    }

    /// Builder method to require an exact panel count.
    pub fn with_expected_panels(mut self, panels: u32) -> Self {
        self.expected_panels = Some(panels);
        self
    }

    /// Whether `speaker` is in the declared set.
    pub fn allows_speaker(&self, speaker: &str) -> bool {
        self.declared_speakers.contains(speaker)
    }
}
