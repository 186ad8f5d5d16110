//! The creative brief an outline is generated from.

use crate::{StoryFormat, StoryType};
use derive_builder::Builder;
use derive_getters::Getters;
use fabulist_error::{BuilderError, BuilderErrorKind, FabulistError, FabulistResult};
use serde::{Deserialize, Serialize};

/// Everything the caller says about the story before it exists.
///
/// # Examples
///
/// ```
/// use fabulist_core::{OutlineBrief, StoryFormat};
///
/// let brief = OutlineBrief::builder()
///     .genre("adventure")
///     .reading_level("grade 2")
///     .tone("playful")
///     .description("A puppy named Max searches for a lost bone.")
///     .speaker_count(2u32)
///     .format(StoryFormat::Visual { number_of_panels: 6 })
///     .build()
///     .unwrap();
///
/// assert_eq!(*brief.speaker_count(), 2);
/// ```
///
/// Deserialization goes through [`BriefRequest`], so a brief read from JSON
/// gets the same payload checks as [`OutlineBrief::from_request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
#[serde(try_from = "BriefRequest")]
pub struct OutlineBrief {
    /// Genre, e.g. "adventure"
    genre: String,
    /// Target reading level
    reading_level: String,
    /// Tone, e.g. "playful"
    tone: String,
    /// Free-text description of the story idea
    description: String,
    /// Number of distinct speakers, including any narrator
    speaker_count: u32,
    /// Visual or audio length budget
    #[serde(flatten)]
    format: StoryFormat,
}

impl OutlineBrief {
    /// Creates a new builder.
    pub fn builder() -> OutlineBriefBuilder {
        OutlineBriefBuilder::default()
    }

    /// Build a brief from the loose fields of an external request.
    ///
    /// # Errors
    ///
    /// Returns `CallerInputError` if the length payload does not match
    /// `story_type`.
    #[track_caller]
    pub fn from_request(request: BriefRequest) -> FabulistResult<Self> {
        let format = StoryFormat::from_request(
            request.story_type,
            request.number_of_panels,
            request.audio_length,
        )?;
        Ok(Self {
            genre: request.genre,
            reading_level: request.reading_level,
            tone: request.tone,
            description: request.description,
            speaker_count: request.speaker_count,
            format,
        })
    }
}

impl OutlineBriefBuilder {
    /// Build the brief.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError` if a required field is unset.
    #[track_caller]
    pub fn build(&self) -> Result<OutlineBrief, BuilderError> {
        self.build_internal().map_err(|e| match e {
            OutlineBriefBuilderError::UninitializedField(field) => {
                BuilderError::new(BuilderErrorKind::MissingField(field.to_string()))
            }
            OutlineBriefBuilderError::ValidationError(message) => {
                BuilderError::new(BuilderErrorKind::ValidationFailed(message))
            }
        })
    }
}

/// A brief as it arrives from outside, with the length payload unchecked.
///
/// # Examples
///
/// ```
/// use fabulist_core::{BriefRequest, OutlineBrief};
///
/// let request: BriefRequest = serde_json::from_str(r#"{
///     "genre": "adventure",
///     "reading_level": "grade 2",
///     "tone": "playful",
///     "description": "A puppy named Max searches for a lost bone.",
///     "speaker_count": 2,
///     "story_type": "visual"
/// }"#).unwrap();
///
/// // Visual stories need a panel count.
/// assert!(OutlineBrief::from_request(request).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefRequest {
    /// Genre
    pub genre: String,
    /// Target reading level
    pub reading_level: String,
    /// Tone
    pub tone: String,
    /// Free-text description of the story idea
    pub description: String,
    /// Number of distinct speakers
    pub speaker_count: u32,
    /// Visual or audio
    pub story_type: StoryType,
    /// Panel count, visual stories only
    #[serde(default)]
    pub number_of_panels: Option<u32>,
    /// Running time in minutes, audio stories only
    #[serde(default)]
    pub audio_length: Option<u32>,
}

impl TryFrom<BriefRequest> for OutlineBrief {
    type Error = FabulistError;

    fn try_from(request: BriefRequest) -> Result<Self, Self::Error> {
        OutlineBrief::from_request(request)
    }
}
