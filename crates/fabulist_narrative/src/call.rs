//! Timeout-bounded collaborator calls.
//!
//! Both helpers fold timeouts and provider errors into a [`Violation`] so
//! the retry loop treats them exactly like a rejected reply.

use fabulist_core::{GenerateRequest, ImageRequest, ImageResponse};
use fabulist_error::Violation;
use fabulist_interface::{FabulistDriver, ImageDriver};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Call the text collaborator and return its reply text.
#[instrument(skip(driver, request), fields(provider = driver.provider_name(), model = driver.model_name(), messages = request.messages().len()))]
pub async fn call_text<D>(
    driver: &D,
    request: &GenerateRequest,
    timeout: Duration,
) -> Result<String, Violation>
where
    D: FabulistDriver + ?Sized,
{
    match tokio::time::timeout(timeout, driver.generate(request)).await {
        Ok(Ok(response)) => {
            let text = response.text();
            debug!(reply_length = text.len(), "Text collaborator replied");
            Ok(text)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Text collaborator failed");
            Err(Violation::provider(e.to_string()))
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Text collaborator timed out");
            Err(Violation::timeout(format!(
                "text call exceeded {} ms",
                timeout.as_millis()
            )))
        }
    }
}

/// Call the image collaborator.
#[instrument(skip(driver, request), fields(provider = driver.provider_name(), model = driver.model_name(), edit = request.reference().is_some()))]
pub async fn call_image<I>(
    driver: &I,
    request: &ImageRequest,
    timeout: Duration,
) -> Result<ImageResponse, Violation>
where
    I: ImageDriver + ?Sized,
{
    match tokio::time::timeout(timeout, driver.render(request)).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => {
            warn!(error = %e, "Image collaborator failed");
            Err(Violation::provider(e.to_string()))
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Image collaborator timed out");
            Err(Violation::timeout(format!(
                "image call exceeded {} ms",
                timeout.as_millis()
            )))
        }
    }
}
