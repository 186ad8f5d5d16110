//! Visual versus audio story payloads.

use fabulist_error::{FabulistResult, StoryError};
use serde::{Deserialize, Serialize};

/// The kind of story being produced, without its payload.
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
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoryType {
    /// Illustrated story with a fixed number of panels
    Visual,
    /// Narrated story with a target running time
    Audio,
}

/// Length budget for a story: panels for visual stories, minutes for audio.
///
/// The two payloads are mutually exclusive, so a visual story can never carry
/// an audio length and vice versa.
///
/// # Examples
///
/// ```
/// use fabulist_core::{StoryFormat, StoryType};
///
/// let visual = StoryFormat::from_request(StoryType::Visual, Some(6), None).unwrap();
/// assert_eq!(visual.number_of_panels(), Some(6));
///
/// // A visual story without panels is rejected before any generation.
/// assert!(StoryFormat::from_request(StoryType::Visual, None, Some(5)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "story_type", rename_all = "lowercase")]
pub enum StoryFormat {
    /// Illustrated story
    Visual {
        /// Exact number of illustrations to produce
        number_of_panels: u32,
    },
    /// Narrated story
    Audio {
        /// Target running time in minutes
        audio_length: u32,
    },
}

impl StoryFormat {
    /// Build a format from the loose fields of an external request.
    ///
    /// # Errors
    ///
    /// Returns `CallerInputError` if the payload matching `story_type` is
    /// missing or zero, or if the other payload is also supplied.
    #[track_caller]
    pub fn from_request(
        story_type: StoryType,
        number_of_panels: Option<u32>,
        audio_length: Option<u32>,
    ) -> FabulistResult<Self> {
        let format = match (story_type, number_of_panels, audio_length) {
            (StoryType::Visual, Some(number_of_panels), None) => {
                StoryFormat::Visual { number_of_panels }
            }
            (StoryType::Audio, None, Some(audio_length)) => StoryFormat::Audio { audio_length },
            (StoryType::Visual, None, _) => {
                return Err(StoryError::caller_input("visual story requires number_of_panels").into());
            }
            (StoryType::Audio, _, None) => {
                return Err(StoryError::caller_input("audio story requires audio_length").into());
            }
            (StoryType::Visual, Some(_), Some(_)) => {
                return Err(StoryError::caller_input("visual story must not set audio_length").into());
            }
            (StoryType::Audio, Some(_), Some(_)) => {
                return Err(
                    StoryError::caller_input("audio story must not set number_of_panels").into(),
                );
            }
        };
        format.validate()?;
        Ok(format)
    }

    /// Reject zero-length budgets.
    #[track_caller]
    pub fn validate(&self) -> FabulistResult<()> {
        match self {
            StoryFormat::Visual { number_of_panels: 0 } => {
                Err(StoryError::caller_input("number_of_panels must be at least 1").into())
            }
            StoryFormat::Audio { audio_length: 0 } => {
                Err(StoryError::caller_input("audio_length must be at least 1 minute").into())
            }
            _ => Ok(()),
        }
    }

    /// The payload-free story type.
    pub fn story_type(&self) -> StoryType {
        match self {
            StoryFormat::Visual { .. } => StoryType::Visual,
            StoryFormat::Audio { .. } => StoryType::Audio,
        }
    }

    /// Panel count for visual stories.
    pub fn number_of_panels(&self) -> Option<u32> {
        match self {
            StoryFormat::Visual { number_of_panels } => Some(*number_of_panels),
            StoryFormat::Audio { .. } => None,
        }
    }

    /// Running time in minutes for audio stories.
    pub fn audio_length(&self) -> Option<u32> {
        match self {
            StoryFormat::Audio { audio_length } => Some(*audio_length),
            StoryFormat::Visual { .. } => None,
        }
    }
}
