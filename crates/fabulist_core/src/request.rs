//! Request and response types for text generation.

use crate::{Message, Output};
use derive_builder::Builder;
use derive_getters::Getters;
use fabulist_error::{BuilderError, BuilderErrorKind};
use serde::{Deserialize, Serialize};

/// A request to the text collaborator.
///
/// # Examples
///
/// ```
/// use fabulist_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Write the beginning.")])
///     .max_tokens(800u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.max_tokens(), Some(800));
/// assert_eq!(*request.temperature(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder, Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    #[builder(default)]
    temperature: Option<f32>,
    /// Model identifier to use
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequestBuilder {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError` if `messages` is unset or the temperature is
    /// outside `[0.0, 2.0]`.
    #[track_caller]
    pub fn build(&self) -> Result<GenerateRequest, BuilderError> {
        let request = self.build_internal().map_err(|e| match e {
            GenerateRequestBuilderError::UninitializedField(field) => {
                BuilderError::new(BuilderErrorKind::MissingField(field.to_string()))
            }
            GenerateRequestBuilderError::ValidationError(message) => {
                BuilderError::new(BuilderErrorKind::ValidationFailed(message))
            }
        })?;
        if let Some(temperature) = request.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(BuilderError::new(BuilderErrorKind::ValidationFailed(
                format!("temperature {} is outside [0.0, 2.0]", temperature),
            )));
        }
        Ok(request)
    }
}

impl GenerateRequest {
    /// Creates a new builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// A request with default sampling parameters.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Builder method to set the model override.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Builder method to set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builder method to cap generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Append a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// The text collaborator's answer.
///
/// # Examples
///
/// ```
/// use fabulist_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse::new(vec![Output::Text("{\"sections\": []}".into())]);
/// assert_eq!(response.text(), "{\"sections\": []}");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Wrap collaborator outputs.
    pub fn new(outputs: Vec<Output>) -> Self {
        Self { outputs }
    }

    /// All textual output joined together; JSON outputs are rendered as text.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .map(|output| match output {
                Output::Text(text) => text.clone(),
                Output::Json(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
