//! Story orchestration for Fabulist.
//!
//! This crate turns a creative brief into a structured story and supports
//! structure-preserving regeneration of single segments and illustrations.
//!
//! # Architecture
//!
//! - [`RetryingGenerator`] drives one collaborator call through the
//!   [`GenerationState`] machine under a bounded attempt budget
//! - The structural validator ([`validate_story_output`] and friends) is pure
//!   and reports the first [`Violation`](fabulist_error::Violation) it finds
//! - [`OutlineGenerator`], [`OutlineExpander`], [`SegmentRegenerator`],
//!   [`ImageGenerator`] and [`ImageRegenerator`] each own one kind of work
//! - [`StoryEngine`] ties them to a pair of collaborators and an [`EngineConfig`]
//!
//! # Numbering
//!
//! Sections and segments are numbered by a [`NumberingCounter`] owned by a
//! single expansion. Numbers are issued only after a part's draft passes
//! validation, so a completed story is always numbered `1..=M` and `1..=K`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod call;
mod config;
mod engine;
mod expander;
mod extraction;
mod images;
mod numbering;
mod outline;
mod panels;
mod prompts;
mod retry;
mod segment;
mod validator;

pub use call::{call_image, call_text};
pub use config::{AttemptBudgets, DEFAULT_MAX_ATTEMPTS, EngineConfig, MAX_SPEAKERS};
pub use engine::StoryEngine;
pub use expander::OutlineExpander;
pub use extraction::{extract_json, parse_reply};
pub use images::{ImageGenerator, ImageRegenerator};
pub use numbering::NumberingCounter;
pub use outline::OutlineGenerator;
pub use panels::{MAX_PANELS, PanelAllocator, PanelAssignment};
pub use prompts::{LengthTarget, apportion, length_targets, retry_hint};
pub use retry::{Generated, GenerationState, RetryingGenerator};
pub use segment::SegmentRegenerator;
pub use validator::{
    DraftPart, DraftSection, DraftSegment, check_constraints, validate_outline_output,
    validate_scene_output, validate_segment_output, validate_story_output, verify_illustrations,
};
