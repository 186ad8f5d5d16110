//! Generic OpenAI-compatible API clients.
//!
//! This module provides reusable clients for any API that follows the OpenAI
//! chat completions and images formats.

mod client;
mod conversions;
mod dto;

pub use client::{OpenAICompatibleClient, OpenAICompatibleImageClient};
pub use conversions::{
    from_chat_response, from_image_response, to_chat_request, to_image_generation_request,
};
pub use dto::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ImageDatum, ImageGenerationRequest,
    ImageGenerationResponse,
};
