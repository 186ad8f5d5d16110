//! Core data types for the Fabulist story generation engine.
//!
//! This crate provides the story data model (parts, sections, segments,
//! illustrations), the caller-facing request payloads, and the request and
//! response shapes exchanged with generative collaborators.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod brief;
mod constraints;
mod format;
mod illustration;
mod image;
mod input;
mod media;
mod message;
mod output;
mod part;
mod request;
mod role;
mod structure;

pub use brief::{BriefRequest, OutlineBrief, OutlineBriefBuilder};
pub use constraints::{GenerationConstraints, GenerationKind};
pub use format::{StoryFormat, StoryType};
pub use illustration::Illustration;
pub use image::{ImageRequest, ImageRequestBuilder, ImageResponse};
pub use input::Input;
pub use media::MediaSource;
pub use message::{Message, MessageBuilder};
pub use output::Output;
pub use part::{PartKind, StoryPart};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use structure::{Section, Segment, Story};
