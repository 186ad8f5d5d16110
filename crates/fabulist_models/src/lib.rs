//! Collaborator integrations for Fabulist.
//!
//! This crate provides text and image drivers for any provider that speaks
//! the OpenAI chat completions and images formats.
//!
//! # Example
//!
//! ```no_run
//! use fabulist_models::OpenAiDriver;
//! use fabulist_interface::FabulistDriver;
//! use fabulist_core::{GenerateRequest, Message};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = OpenAiDriver::new("gpt-4o-mini".to_string())?;
//! let request = GenerateRequest::new(vec![Message::user("Hello")]);
//! let response = driver.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;
pub mod openai_compat;

pub use openai::{API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, OpenAiDriver, OpenAiImageDriver};
pub use openai_compat::{OpenAICompatibleClient, OpenAICompatibleImageClient};
