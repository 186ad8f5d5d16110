//! OpenAI drivers built on the OpenAI-compatible clients.

use crate::openai_compat::{OpenAICompatibleClient, OpenAICompatibleImageClient};
use async_trait::async_trait;
use fabulist_core::{GenerateRequest, GenerateResponse, ImageRequest, ImageResponse};
use fabulist_error::{FabulistResult, ProviderError, ProviderErrorKind};
use fabulist_interface::{FabulistDriver, ImageDriver};
use tracing::instrument;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "FABULIST_API_KEY";

/// Environment variable overriding the API root.
pub const BASE_URL_VAR: &str = "FABULIST_BASE_URL";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[track_caller]
fn api_key_from_env() -> Result<String, ProviderError> {
    std::env::var(API_KEY_VAR).map_err(|e| {
        ProviderError::new(ProviderErrorKind::NotConfigured(format!(
            "{} not set: {}",
            API_KEY_VAR, e
        )))
    })
}

fn base_url_from_env() -> String {
    std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Text collaborator backed by a chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiDriver {
    inner: OpenAICompatibleClient,
}

impl OpenAiDriver {
    /// Creates a driver for `model`.
    ///
    /// Reads the API key from `FABULIST_API_KEY` and the API root from
    /// `FABULIST_BASE_URL`, defaulting to OpenAI.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if the API key is not set.
    #[instrument(skip_all, fields(model = %model))]
    pub fn new(model: String) -> FabulistResult<Self> {
        let api_key = api_key_from_env()?;
        Ok(Self::with_api_key(api_key, model, base_url_from_env()))
    }

    /// Creates a driver with an explicit API key and root.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn with_api_key(api_key: String, model: String, base_url: String) -> Self {
        Self {
            inner: OpenAICompatibleClient::new(api_key, model, base_url, "openai"),
        }
    }
}

#[async_trait]
impl FabulistDriver for OpenAiDriver {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.inner.model_name()))]
    async fn generate(&self, req: &GenerateRequest) -> FabulistResult<GenerateResponse> {
        Ok(self.inner.generate(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Image collaborator backed by the images endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiImageDriver {
    inner: OpenAICompatibleImageClient,
}

impl OpenAiImageDriver {
    /// Creates an image driver for `model`, configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if the API key is not set.
    #[instrument(skip_all, fields(model = %model))]
    pub fn new(model: String) -> FabulistResult<Self> {
        let api_key = api_key_from_env()?;
        Ok(Self::with_api_key(api_key, model, base_url_from_env()))
    }

    /// Creates an image driver with an explicit API key and root.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn with_api_key(api_key: String, model: String, base_url: String) -> Self {
        Self {
            inner: OpenAICompatibleImageClient::new(api_key, model, base_url, "openai"),
        }
    }
}

#[async_trait]
impl ImageDriver for OpenAiImageDriver {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.inner.model_name()))]
    async fn render(&self, req: &ImageRequest) -> FabulistResult<ImageResponse> {
        Ok(self.inner.render(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
