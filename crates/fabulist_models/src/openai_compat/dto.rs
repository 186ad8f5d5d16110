//! Data transfer objects for OpenAI-compatible APIs.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message content
    pub message: ChatMessage,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices
    pub choices: Vec<ChatChoice>,
}

/// OpenAI image generation request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageGenerationRequest {
    /// Model identifier
    model: String,
    /// Scene description, style included
    prompt: String,
    /// Number of images
    #[builder(default = "1")]
    n: u32,
    /// "b64_json" or "url"
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<String>,
    /// Image size, e.g. "1024x1024"
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
}

impl ImageGenerationRequest {
    /// Creates a new builder for ImageGenerationRequest.
    pub fn builder() -> ImageGenerationRequestBuilder {
        ImageGenerationRequestBuilder::default()
    }
}

/// One generated image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDatum {
    /// Base64-encoded image, when requested
    #[serde(default)]
    pub b64_json: Option<String>,
    /// Hosted image URL, when requested
    #[serde(default)]
    pub url: Option<String>,
}

/// OpenAI image generation or edit response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    /// Generated images
    pub data: Vec<ImageDatum>,
}
