//! Generated panel illustrations.

use crate::MediaSource;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One illustration slot of a visual story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Illustration {
    /// Panel slot, in `1..=number_of_panels`
    panel_number: u32,
    /// Segment the panel's scene is anchored to
    segment_number: u32,
    /// Scene description the image was rendered from
    scene: String,
    /// MIME type of the image, when known
    mime: Option<String>,
    /// The image itself
    source: MediaSource,
}

impl Illustration {
    /// Create an illustration.
    pub fn new(
        panel_number: u32,
        segment_number: u32,
        scene: impl Into<String>,
        mime: Option<String>,
        source: MediaSource,
    ) -> Self {
        Self {
            panel_number,
            segment_number,
            scene: scene.into(),
            mime,
            source,
        }
    }

    /// Same slot and anchor, new image.
    pub fn with_image(&self, scene: impl Into<String>, mime: Option<String>, source: MediaSource) -> Self {
        Self {
            panel_number: self.panel_number,
            segment_number: self.segment_number,
            scene: scene.into(),
            mime,
            source,
        }
    }
}
