//! Request and response types for image generation.

use crate::MediaSource;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A request to the image collaborator.
///
/// Either a fresh scene (`prompt` + `style`) or an edit of a reference image
/// (`reference` + `prompt` as the modification request).
///
/// # Examples
///
/// ```
/// use fabulist_core::ImageRequest;
///
/// let request = ImageRequest::builder()
///     .prompt("Max digs under the old oak tree")
///     .style(Some("watercolor".to_string()))
///     .build()
///     .unwrap();
///
/// assert!(request.reference().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Scene description, or the modification to apply to `reference`
    prompt: String,
    /// Art style
    #[builder(default)]
    style: Option<String>,
    /// Image to modify
    #[builder(default)]
    reference: Option<MediaSource>,
    /// MIME type of `reference`
    #[builder(default)]
    reference_mime: Option<String>,
}

impl ImageRequest {
    /// Creates a new builder.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }

    /// Create a request from all of its parts.
    pub fn new(
        prompt: impl Into<String>,
        style: Option<String>,
        reference: Option<MediaSource>,
        reference_mime: Option<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            style,
            reference,
            reference_mime,
        }
    }
}

/// The image collaborator's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageResponse {
    /// MIME type, when the provider reports one
    mime: Option<String>,
    /// Image content
    source: MediaSource,
}

impl ImageResponse {
    /// Wrap collaborator output.
    pub fn new(mime: Option<String>, source: MediaSource) -> Self {
        Self { mime, source }
    }

    /// Split into parts.
    pub fn into_parts(self) -> (Option<String>, MediaSource) {
        (self.mime, self.source)
    }
}
