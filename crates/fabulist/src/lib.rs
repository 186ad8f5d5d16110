//! Fabulist - children's story generation.
//!
//! Fabulist turns a short brief into a three-part outline, expands the
//! outline into a globally numbered story, and illustrates visual stories
//! with a fixed number of panels. Every collaborator reply is validated
//! against the structure that was asked for, and unmet constraints are
//! retried within a bounded attempt budget.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabulist::{EngineConfig, OpenAiDriver, OpenAiImageDriver, OutlineBrief, StoryEngine, StoryFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = StoryEngine::new(
//!         OpenAiDriver::new("gpt-4o-mini".to_string())?,
//!         OpenAiImageDriver::new("gpt-image-1".to_string())?,
//!         EngineConfig::load()?,
//!     )?;
//!
//!     let brief = OutlineBrief::builder()
//!         .genre("adventure")
//!         .reading_level("grade 2")
//!         .tone("playful")
//!         .description("A puppy named Max searches for a lost bone.")
//!         .speaker_count(2u32)
//!         .format(StoryFormat::Visual { number_of_panels: 6 })
//!         .build()?;
//!
//!     let parts = engine.generate_outline(&brief).await?;
//!     let story = engine.generate_full_story(&parts, brief.format()).await?;
//!     println!("{} segments", story.segment_count());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `fabulist_error` - Error and violation types
//! - `fabulist_core` - Story, outline and collaborator request types
//! - `fabulist_interface` - Text and image driver traits
//! - `fabulist_models` - OpenAI-compatible drivers
//! - `fabulist_narrative` - Validation, retry and the story engine
//!
//! This crate (`fabulist`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use fabulist_core::*;
pub use fabulist_error::*;
pub use fabulist_interface::*;
pub use fabulist_models::*;
pub use fabulist_narrative::{
    AttemptBudgets, DEFAULT_MAX_ATTEMPTS, EngineConfig, Generated, GenerationState,
    ImageGenerator, ImageRegenerator, MAX_PANELS, MAX_SPEAKERS, OutlineExpander, OutlineGenerator,
    PanelAllocator, PanelAssignment, RetryingGenerator, SegmentRegenerator, StoryEngine,
};

pub mod observability;
