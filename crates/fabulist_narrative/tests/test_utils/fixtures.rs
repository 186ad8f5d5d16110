//! Story fixtures and canned model replies.

use fabulist_core::{OutlineBrief, PartKind, StoryFormat, StoryPart};
use fabulist_narrative::EngineConfig;
use serde_json::json;
use std::time::Duration;

/// Outline parts where every part declares Narrator and Max.
pub fn puppy_parts() -> Vec<StoryPart> {
    vec![
        StoryPart::new(PartKind::Beginning, "Max loses his bone.", ["Narrator", "Max"]),
        StoryPart::new(PartKind::Middle, "Max searches the yard.", ["Narrator", "Max"]),
        StoryPart::new(PartKind::End, "Max finds the bone under the oak.", ["Narrator", "Max"]),
    ]
}

/// A brief for a two-speaker visual story.
pub fn puppy_brief(speaker_count: u32, number_of_panels: u32) -> OutlineBrief {
    OutlineBrief::builder()
        .genre("adventure")
        .reading_level("grade 2")
        .tone("playful")
        .description("A puppy named Max searches for a lost bone.")
        .speaker_count(speaker_count)
        .format(StoryFormat::Visual { number_of_panels })
        .build()
        .unwrap()
}

/// Engine configuration with short timeouts for tests.
pub fn test_config() -> EngineConfig {
    EngineConfig::default()
        .with_text_timeout(Duration::from_millis(200))
        .with_image_timeout(Duration::from_millis(200))
}

/// A part reply: `sections` holds (speaker, content) pairs per section.
pub fn part_reply(sections: &[&[(&str, &str)]]) -> String {
    let sections: Vec<_> = sections
        .iter()
        .map(|segments| {
            let segments: Vec<_> = segments
                .iter()
                .map(|(speaker, content)| json!({ "speaker": speaker, "content": content }))
                .collect();
            json!({ "segments": segments })
        })
        .collect();
    json!({ "sections": sections }).to_string()
}

/// A valid outline reply.
pub fn outline_reply() -> String {
    json!({
        "parts": [
            { "part_kind": "beginning", "summary": "Max loses his bone.", "declared_speakers": ["Narrator", "Max"] },
            { "part_kind": "middle", "summary": "Max searches the yard.", "declared_speakers": ["Narrator", "Max"] },
            { "part_kind": "end", "summary": "Max finds the bone.", "declared_speakers": ["Narrator", "Max"] }
        ]
    })
    .to_string()
}

/// A scene plan reply with `count` scenes.
pub fn scenes_reply(count: usize) -> String {
    let scenes: Vec<String> = (1..=count).map(|n| format!("Scene {n}: Max in the yard")).collect();
    json!({ "scenes": scenes }).to_string()
}

/// A segment regeneration reply.
pub fn segment_reply(segment_number: u32, speaker: &str, content: &str) -> String {
    json!({ "segment_number": segment_number, "speaker": speaker, "content": content }).to_string()
}
