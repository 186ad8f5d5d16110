//! Generic clients for OpenAI-compatible APIs.

use crate::openai_compat::{ChatResponse, ImageGenerationResponse, conversions};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fabulist_core::{GenerateRequest, GenerateResponse, ImageRequest, ImageResponse, MediaSource};
use fabulist_error::{ProviderError, ProviderErrorKind};
use reqwest::{Client, Response, StatusCode, multipart};
use tracing::{debug, error, instrument};

/// Map a non-success HTTP status into a provider error.
async fn check_status(response: Response, provider: &'static str) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    error!(provider, status = %status, error = %error_text, "API error");

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::new(ProviderErrorKind::RateLimit));
    }
    Err(ProviderError::new(ProviderErrorKind::Api {
        status: status.as_u16(),
        message: error_text,
    }))
}

/// Generic chat-completions client for any OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider_name: &'static str,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for authentication
    /// * `model` - Model identifier
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `provider_name` - Name of the provider (for logging/tracing)
    #[instrument(skip(api_key), fields(provider = provider_name, model = %model))]
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        provider_name: &'static str,
    ) -> Self {
        debug!(url = %base_url, "Created OpenAI-compatible client");

        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider_name,
        }
    }

    /// Generates a response from the chat completions endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, req), fields(provider = self.provider_name, model = %self.model))]
    pub async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let chat_request = conversions::to_chat_request(req, &self.model)?;

        debug!(
            message_count = chat_request.messages().len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let response = check_status(response, self.provider_name).await?;

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");

        conversions::from_chat_response(&chat_response)
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

/// Generic images client for any OpenAI-compatible API.
///
/// Scene requests go to `/images/generations`; requests with a reference
/// image go to `/images/edits` as multipart uploads.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider_name: &'static str,
}

impl OpenAICompatibleImageClient {
    /// Creates a new OpenAI-compatible image client.
    #[instrument(skip(api_key), fields(provider = provider_name, model = %model))]
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        provider_name: &'static str,
    ) -> Self {
        debug!(url = %base_url, "Created OpenAI-compatible image client");

        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider_name,
        }
    }

    /// Renders one image, generating or editing depending on the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference cannot be loaded, the request
    /// fails, or the response carries no image.
    #[instrument(skip(self, req), fields(provider = self.provider_name, model = %self.model, edit = req.reference().is_some()))]
    pub async fn render(&self, req: &ImageRequest) -> Result<ImageResponse, ProviderError> {
        let response = match req.reference() {
            None => {
                let body = conversions::to_image_generation_request(req, &self.model)?;
                self.client
                    .post(format!("{}/images/generations", self.base_url))
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await
            }
            Some(reference) => {
                let bytes = self.load_reference(reference).await?;
                let mime = req
                    .reference_mime()
                    .clone()
                    .unwrap_or_else(|| "image/png".to_string());
                let image = multipart::Part::bytes(bytes)
                    .file_name("reference.png")
                    .mime_str(&mime)
                    .map_err(|e| {
                        ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
                            "Invalid reference MIME type {}: {}",
                            mime, e
                        )))
                    })?;
                let form = multipart::Form::new()
                    .text("model", self.model.clone())
                    .text("prompt", req.prompt().clone())
                    .text("response_format", "b64_json")
                    .part("image", image);
                self.client
                    .post(format!("{}/images/edits", self.base_url))
                    .bearer_auth(&self.api_key)
                    .multipart(form)
                    .send()
                    .await
            }
        }
        .map_err(|e| {
            error!(error = ?e, "HTTP request failed");
            ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
        })?;

        let response = check_status(response, self.provider_name).await?;

        let image_response: ImageGenerationResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse image response");
            ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(images = image_response.data.len(), "Received image response");

        conversions::from_image_response(&image_response)
    }

    /// Raw bytes of a reference image.
    async fn load_reference(&self, source: &MediaSource) -> Result<Vec<u8>, ProviderError> {
        match source {
            MediaSource::Binary(bytes) => Ok(bytes.clone()),
            MediaSource::Base64(data) => STANDARD.decode(data.trim()).map_err(|e| {
                ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
                    "Reference image is not valid base64: {}",
                    e
                )))
            }),
            MediaSource::Url(url) => {
                let response = self.client.get(url).send().await.map_err(|e| {
                    ProviderError::new(ProviderErrorKind::Http(format!(
                        "Failed to fetch reference image: {}",
                        e
                    )))
                })?;
                let response = check_status(response, self.provider_name).await?;
                let bytes = response.bytes().await.map_err(|e| {
                    ProviderError::new(ProviderErrorKind::Http(format!(
                        "Failed to read reference image: {}",
                        e
                    )))
                })?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}
