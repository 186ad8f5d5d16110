//! Trait definitions for text and image backends.

use async_trait::async_trait;
use fabulist_core::{GenerateRequest, GenerateResponse, ImageRequest, ImageResponse};
use fabulist_error::FabulistResult;

/// Core trait that all text backends must implement.
///
/// Implementations may be slow, non-deterministic and occasionally return
/// malformed output; the engine validates and retries around them.
#[async_trait]
pub trait FabulistDriver: Send + Sync {
    /// Generate model output for a conversation.
    async fn generate(&self, req: &GenerateRequest) -> FabulistResult<GenerateResponse>;

    /// Provider name (e.g., "openai", "groq").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Trait for backends that produce images.
#[async_trait]
pub trait ImageDriver: Send + Sync {
    /// Render one image, either from a scene description or by modifying a
    /// reference image.
    async fn render(&self, req: &ImageRequest) -> FabulistResult<ImageResponse>;

    /// Provider name.
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: FabulistDriver + ?Sized> FabulistDriver for std::sync::Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> FabulistResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: ImageDriver + ?Sized> ImageDriver for std::sync::Arc<T> {
    async fn render(&self, req: &ImageRequest) -> FabulistResult<ImageResponse> {
        (**self).render(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
