//! Input types for collaborator requests.

use crate::MediaSource;
use serde::{Deserialize, Serialize};

/// Content sent to a text collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input, e.g. a reference panel.
    Image {
        /// MIME type, e.g., "image/png"
        mime: Option<String>,
        /// Media source (URL, base64, or raw bytes)
        source: MediaSource,
    },
}
