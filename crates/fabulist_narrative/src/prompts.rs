//! Request assembly for every generation kind.
//!
//! Each builder returns a complete [`GenerateRequest`] or [`ImageRequest`].
//! When a retry carries the previous violation, it is appended as a final
//! user message so the model sees exactly which constraint it missed.

use crate::config::EngineConfig;
use fabulist_core::{
    GenerateRequest, Illustration, ImageRequest, Message, OutlineBrief, PartKind, Section,
    Segment, StoryFormat, StoryPart,
};
use fabulist_error::Violation;
use std::fmt::Write as _;

const SYSTEM_PROMPT: &str = "You are a children's story writer working inside a structured \
pipeline. Reply with a single JSON value exactly matching the requested shape. Output ONLY \
valid JSON, with no commentary.";

/// Length signal for one part of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum LengthTarget {
    /// Roughly this many sections, one per panel
    #[display("about {} section(s)", _0)]
    Sections(u32),
    /// Roughly this many narrated words
    #[display("about {} words", _0)]
    Words(u32),
}

/// Split `total` into `parts` shares as evenly as possible.
///
/// The remainder goes to the earliest shares.
///
/// # Examples
///
/// ```
/// use fabulist_narrative::apportion;
///
/// assert_eq!(apportion(7, 3), vec![3, 2, 2]);
/// assert_eq!(apportion(6, 3), vec![2, 2, 2]);
/// assert_eq!(apportion(2, 3), vec![1, 1, 0]);
/// ```
pub fn apportion(total: u32, parts: u32) -> Vec<u32> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let remainder = total % parts;
    (0..parts)
        .map(|index| base + u32::from(index < remainder))
        .collect()
}

/// Per-part length targets for a story format, in part order.
///
/// Visual stories never get a zero-section target.
pub fn length_targets(format: &StoryFormat, words_per_minute: u32) -> [LengthTarget; 3] {
    let parts = PartKind::ORDER.len() as u32;
    let shares = match format {
        StoryFormat::Visual { number_of_panels } => apportion(*number_of_panels, parts)
            .into_iter()
            .map(|share| LengthTarget::Sections(share.max(1)))
            .collect::<Vec<_>>(),
        StoryFormat::Audio { audio_length } => {
            apportion(audio_length.saturating_mul(words_per_minute), parts)
                .into_iter()
                .map(LengthTarget::Words)
                .collect::<Vec<_>>()
        }
    };
    [shares[0], shares[1], shares[2]]
}

fn text_request(config: &EngineConfig, messages: Vec<Message>, hint: Option<&Violation>) -> GenerateRequest {
    let mut request = GenerateRequest::new(messages)
        .with_model(config.text_model().clone())
        .with_temperature(*config.temperature());
    if let Some(violation) = hint {
        request.push(Message::user(retry_hint(violation)));
    }
    request
}

/// The feedback line appended to a retried request.
pub fn retry_hint(violation: &Violation) -> String {
    format!(
        "Your previous reply was rejected ({}). Fix exactly this problem and reply again with valid JSON only.",
        violation
    )
}

/// Request a three-part outline from a brief.
pub fn outline_request(
    config: &EngineConfig,
    brief: &OutlineBrief,
    hint: Option<&Violation>,
) -> GenerateRequest {
    let length = match brief.format() {
        StoryFormat::Visual { number_of_panels } => {
            format!("an illustrated story told across {} panels", number_of_panels)
        }
        StoryFormat::Audio { audio_length } => {
            format!("a narrated story about {} minute(s) long", audio_length)
        }
    };
    let prompt = format!(
        "Outline {length}.\n\
         Genre: {genre}\nReading level: {level}\nTone: {tone}\nIdea: {description}\n\
         Use at most {speakers} distinct speakers in total, counting any narrator.\n\n\
         Reply with {{\"parts\": [{{\"part_kind\": \"beginning\"|\"middle\"|\"end\", \
         \"summary\": string, \"declared_speakers\": [string]}}]}} containing exactly three \
         parts in the order beginning, middle, end.",
        genre = brief.genre(),
        level = brief.reading_level(),
        tone = brief.tone(),
        description = brief.description(),
        speakers = brief.speaker_count(),
    );
    text_request(config, vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)], hint)
}

/// Request the sections and segments for one outline part.
///
/// `story_so_far` is every section already accepted from earlier parts.
pub fn story_part_request(
    config: &EngineConfig,
    parts: &[StoryPart],
    part: &StoryPart,
    target: LengthTarget,
    story_so_far: &[Section],
    hint: Option<&Violation>,
) -> GenerateRequest {
    let mut prompt = String::from("Story outline:\n");
    for outline_part in parts {
        let _ = writeln!(prompt, "- {}: {}", outline_part.part_kind(), outline_part.summary());
    }

    if !story_so_far.is_empty() {
        prompt.push_str("\nStory so far:\n");
        for segment in story_so_far.iter().flat_map(|s| s.segments().iter()) {
            let _ = writeln!(prompt, "{}: {}", segment.speaker(), segment.content());
        }
    }

    let speakers = part
        .declared_speakers()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(
        prompt,
        "\nWrite the {kind} part now, continuing directly from the story so far. \
         Aim for {target}. Every segment's speaker must be one of: {speakers}.\n\n\
         Reply with {{\"sections\": [{{\"segments\": [{{\"speaker\": string, \"content\": string}}]}}]}}. \
         Every section needs at least one segment.",
        kind = part.part_kind(),
    );

    text_request(config, vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)], hint)
}

/// Request replacement content for one segment, with the whole story as context.
pub fn segment_request(
    config: &EngineConfig,
    segments: &[Segment],
    target: &Segment,
    user_request: &str,
    part: &StoryPart,
    tone: Option<&str>,
    hint: Option<&Violation>,
) -> GenerateRequest {
    let mut prompt = String::from("Full story, one segment per line:\n");
    for segment in segments {
        let marker = if segment.segment_number() == target.segment_number() {
            ">>"
        } else {
            "  "
        };
        let _ = writeln!(
            prompt,
            "{} [{}] {}: {}",
            marker,
            segment.segment_number(),
            segment.speaker(),
            segment.content()
        );
    }
    let _ = write!(
        prompt,
        "\nRewrite only segment {number} (marked >>), which belongs to the {kind} part: {summary}\n\
         Change request: {user_request}\n",
        number = target.segment_number(),
        kind = part.part_kind(),
        summary = part.summary(),
    );
    if let Some(tone) = tone {
        let _ = writeln!(prompt, "Keep the tone {}.", tone);
    }
    let _ = write!(
        prompt,
        "The speaker must stay \"{speaker}\" and the new content must fit the segments before and after it.\n\n\
         Reply with {{\"segment_number\": {number}, \"speaker\": \"{speaker}\", \"content\": string}}.",
        speaker = target.speaker(),
        number = target.segment_number(),
    );

    text_request(config, vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)], hint)
}

/// Request one scene description per panel.
///
/// `anchors` holds the anchor segment of each panel in panel order.
pub fn scene_plan_request(
    config: &EngineConfig,
    anchors: &[&Segment],
    art_style: &str,
    hint: Option<&Violation>,
) -> GenerateRequest {
    let mut prompt = format!(
        "Describe one illustration for each of the {} panels below, in {} style.\n",
        anchors.len(),
        art_style
    );
    for (index, segment) in anchors.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "Panel {}: {}: {}",
            index + 1,
            segment.speaker(),
            segment.content()
        );
    }
    let _ = write!(
        prompt,
        "\nReply with {{\"scenes\": [string]}} containing exactly {} scene descriptions, one per panel, in panel order.",
        anchors.len()
    );

    text_request(config, vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)], hint)
}

/// Request one panel image from its scene.
pub fn panel_image_request(scene: &str, art_style: &str, hint: Option<&Violation>) -> ImageRequest {
    let prompt = match hint {
        Some(violation) => format!("{} (previous attempt failed: {})", scene, violation.detail),
        None => scene.to_string(),
    };
    ImageRequest::new(prompt, Some(art_style.to_string()), None, None)
}

/// Request a modified copy of an existing illustration.
pub fn image_edit_request(
    original: &Illustration,
    user_request: &str,
    hint: Option<&Violation>,
) -> ImageRequest {
    let mut prompt = format!(
        "Modify this illustration of \"{}\" as follows: {}",
        original.scene(),
        user_request
    );
    if let Some(violation) = hint {
        let _ = write!(prompt, " (previous attempt failed: {})", violation.detail);
    }
    ImageRequest::new(
        prompt,
        None,
        Some(original.source().clone()),
        original.mime().clone(),
    )
}
