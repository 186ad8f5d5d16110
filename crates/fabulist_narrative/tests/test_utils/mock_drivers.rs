//! Scripted text and image collaborators.

use async_trait::async_trait;
use fabulist_core::{
    GenerateRequest, GenerateResponse, ImageRequest, ImageResponse, MediaSource, Output,
};
use fabulist_error::{FabulistResult, ProviderError, ProviderErrorKind};
use fabulist_interface::{FabulistDriver, ImageDriver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted text reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply with this text
    Text(String),
    /// Fail with this provider error
    Error(ProviderErrorKind),
    /// Wait, then reply with this text
    Delayed(Duration, String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }
}

/// Text collaborator that replays a script and records every request.
///
/// Once the script runs out the last entry repeats.
pub struct MockTextDriver {
    script: Vec<MockReply>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockTextDriver {
    /// Reply with each entry in turn.
    pub fn new_sequence(script: Vec<MockReply>) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always reply with the same text.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockReply::text(text)])
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_reply(&self, request: &GenerateRequest) -> MockReply {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request.clone());
        self.script
            .get(index)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or_else(|| MockReply::Error(ProviderErrorKind::InvalidRequest("empty script".into())))
    }
}

#[async_trait]
impl FabulistDriver for MockTextDriver {
    async fn generate(&self, req: &GenerateRequest) -> FabulistResult<GenerateResponse> {
        match self.next_reply(req) {
            MockReply::Text(text) => Ok(GenerateResponse::new(vec![Output::Text(text)])),
            MockReply::Error(kind) => Err(ProviderError::new(kind).into()),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(GenerateResponse::new(vec![Output::Text(text)]))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-text"
    }
}

/// One scripted image reply.
#[derive(Debug, Clone)]
pub enum MockImage {
    /// Reply with a small PNG-looking payload
    Image,
    /// Reply with no image data
    Empty,
    /// Fail with this provider error
    Error(ProviderErrorKind),
}

/// Image collaborator that replays a script and records every request.
pub struct MockImageDriver {
    script: Vec<MockImage>,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockImageDriver {
    /// Reply with each entry in turn; the last one repeats.
    pub fn new_sequence(script: Vec<MockImage>) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always return an image.
    pub fn new_success() -> Self {
        Self::new_sequence(vec![MockImage::Image])
    }

    /// Number of times render() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageDriver for MockImageDriver {
    async fn render(&self, req: &ImageRequest) -> FabulistResult<ImageResponse> {
        let reply = {
            let mut requests = self.requests.lock().unwrap();
            let index = requests.len();
            requests.push(req.clone());
            self.script
                .get(index)
                .or_else(|| self.script.last())
                .cloned()
                .unwrap_or(MockImage::Empty)
        };
        match reply {
            MockImage::Image => Ok(ImageResponse::new(
                Some("image/png".to_string()),
                MediaSource::Binary(vec![0x89, 0x50, 0x4E, 0x47, index_byte(req)]),
            )),
            MockImage::Empty => Ok(ImageResponse::new(None, MediaSource::Binary(Vec::new()))),
            MockImage::Error(kind) => Err(ProviderError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-image"
    }
}

/// Last byte of the prompt, so different prompts yield different images.
fn index_byte(req: &ImageRequest) -> u8 {
    req.prompt().bytes().last().unwrap_or(0)
}
