//! Type conversions between Fabulist and OpenAI formats.

use crate::openai_compat::{
    ChatMessage, ChatRequest, ChatResponse, ImageGenerationRequest, ImageGenerationResponse,
};
use fabulist_core::{
    GenerateRequest, GenerateResponse, ImageRequest, ImageResponse, Input, MediaSource, Output,
    Role,
};
use fabulist_error::{ProviderError, ProviderErrorKind};

/// Converts a Fabulist GenerateRequest to OpenAI chat format.
///
/// The request's own model wins over `default_model`.
///
/// # Errors
///
/// Returns `InvalidRequest` for non-text inputs.
#[track_caller]
pub fn to_chat_request(
    req: &GenerateRequest,
    default_model: &str,
) -> Result<ChatRequest, ProviderError> {
    let mut messages = Vec::new();

    for msg in req.messages() {
        let role = match msg.role() {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };

        for content in msg.content() {
            match content {
                Input::Text(text) => {
                    messages.push(ChatMessage {
                        role: role.to_string(),
                        content: text.clone(),
                    });
                }
                Input::Image { .. } => {
                    return Err(ProviderError::new(ProviderErrorKind::InvalidRequest(
                        "Only text inputs supported in chat requests".to_string(),
                    )));
                }
            }
        }
    }

    let model = req.model().clone().unwrap_or_else(|| default_model.to_string());
    let mut builder = ChatRequest::builder();
    builder.model(model).messages(messages);

    if let Some(max_tokens) = req.max_tokens() {
        builder.max_tokens(*max_tokens);
    }

    if let Some(temp) = req.temperature() {
        builder.temperature(*temp);
    }

    builder.build().map_err(|e| {
        ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
            "Failed to build request: {}",
            e
        )))
    })
}

/// Converts an OpenAI chat response to a Fabulist GenerateResponse.
///
/// # Errors
///
/// Returns `ResponseParsing` if the response has no choices.
#[track_caller]
pub fn from_chat_response(response: &ChatResponse) -> Result<GenerateResponse, ProviderError> {
    let content = response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::ResponseParsing(
                "No choices in response".to_string(),
            ))
        })?;

    Ok(GenerateResponse::new(vec![Output::Text(content)]))
}

/// Converts a scene request into an image generation request.
///
/// The art style is folded into the prompt.
///
/// # Errors
///
/// Returns `InvalidRequest` for edit requests, which use multipart instead.
#[track_caller]
pub fn to_image_generation_request(
    req: &ImageRequest,
    model: &str,
) -> Result<ImageGenerationRequest, ProviderError> {
    if req.reference().is_some() {
        return Err(ProviderError::new(ProviderErrorKind::InvalidRequest(
            "Image edits are sent to the edits endpoint".to_string(),
        )));
    }

    let prompt = match req.style() {
        Some(style) => format!("{}. Art style: {}.", req.prompt(), style),
        None => req.prompt().clone(),
    };

    ImageGenerationRequest::builder()
        .model(model)
        .prompt(prompt)
        .response_format(Some("b64_json".to_string()))
        .build()
        .map_err(|e| {
            ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
                "Failed to build image request: {}",
                e
            )))
        })
}

/// Converts an image response into a Fabulist ImageResponse.
///
/// # Errors
///
/// Returns `ResponseParsing` if the first image carries neither data nor URL.
#[track_caller]
pub fn from_image_response(response: &ImageGenerationResponse) -> Result<ImageResponse, ProviderError> {
    let datum = response.data.first().ok_or_else(|| {
        ProviderError::new(ProviderErrorKind::ResponseParsing(
            "No images in response".to_string(),
        ))
    })?;

    match (&datum.b64_json, &datum.url) {
        (Some(b64), _) => Ok(ImageResponse::new(
            Some("image/png".to_string()),
            MediaSource::Base64(b64.clone()),
        )),
        (None, Some(url)) => Ok(ImageResponse::new(None, MediaSource::Url(url.clone()))),
        (None, None) => Err(ProviderError::new(ProviderErrorKind::ResponseParsing(
            "Image entry has neither b64_json nor url".to_string(),
        ))),
    }
}
