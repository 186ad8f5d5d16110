//! Top-level narrative divisions produced by outlining.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One of the three fixed narrative divisions.
///
/// # Examples
///
/// ```
/// use fabulist_core::PartKind;
///
/// assert_eq!(PartKind::ORDER[0], PartKind::Beginning);
/// assert_eq!(format!("{}", PartKind::Middle), "middle");
/// assert!(PartKind::Beginning < PartKind::End);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PartKind {
    /// Setup and introduction
    Beginning,
    /// Development and conflict
    Middle,
    /// Resolution
    End,
}

impl PartKind {
    /// The only valid processing order.
    pub const ORDER: [PartKind; 3] = [PartKind::Beginning, PartKind::Middle, PartKind::End];

    /// Zero-based position in [`PartKind::ORDER`].
    pub fn index(&self) -> usize {
        match self {
            PartKind::Beginning => 0,
            PartKind::Middle => 1,
            PartKind::End => 2,
        }
    }
}

/// A part of the outline: its summary and the speakers allowed in it.
///
/// Written once when the outline is created and read-only afterwards.
///
/// # Examples
///
/// ```
/// use fabulist_core::{PartKind, StoryPart};
///
/// let part = StoryPart::new(PartKind::Beginning, "Max finds a map.", ["Narrator", "Max"]);
/// assert!(part.declares("Max"));
/// assert!(!part.declares("Luna"));
/// assert_eq!(part.declared_speakers().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StoryPart {
    /// Which division this is
    part_kind: PartKind,
    /// What happens in this part
    summary: String,
    /// Speakers that may appear in this part's segments
    declared_speakers: BTreeSet<String>,
}

impl StoryPart {
    /// Create a part.
    pub fn new<S: Into<String>>(
        part_kind: PartKind,
        summary: impl Into<String>,
        declared_speakers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            part_kind,
            summary: summary.into(),
            declared_speakers: declared_speakers.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `speaker` is declared for this part.
    pub fn declares(&self, speaker: &str) -> bool {
        self.declared_speakers.contains(speaker)
    }
}
