use fabulist_core::{
    BriefRequest, GenerateRequest, Message, OutlineBrief, PartKind, Section, Segment, Story,
    StoryFormat, StoryPart, StoryType,
};
use fabulist_error::{BuilderErrorKind, StoryErrorKind};

fn parts() -> Vec<StoryPart> {
    PartKind::ORDER
        .iter()
        .map(|kind| StoryPart::new(*kind, format!("{kind} summary"), ["Narrator", "Max"]))
        .collect()
}

fn two_section_story() -> Story {
    let sections = vec![
        Section::new(
            1,
            PartKind::Beginning,
            vec![
                Segment::new(1, 1, PartKind::Beginning, "Narrator", "Max woke early."),
                Segment::new(2, 1, PartKind::Beginning, "Max", "Where is my bone?"),
            ],
        ),
        Section::new(
            2,
            PartKind::Middle,
            vec![Segment::new(3, 2, PartKind::Middle, "Narrator", "He searched the yard.")],
        ),
        Section::new(
            3,
            PartKind::End,
            vec![Segment::new(4, 3, PartKind::End, "Max", "Found it!")],
        ),
    ];
    Story::new(parts(), StoryFormat::Visual { number_of_panels: 4 }, sections)
}

fn story_error_kind(err: &fabulist_error::FabulistError) -> StoryErrorKind {
    err.as_story().expect("story error").kind.clone()
}

#[test]
fn verify_accepts_gap_free_story() {
    let story = two_section_story();
    assert!(story.verify().is_ok());
    assert_eq!(story.section_count(), 3);
    assert_eq!(story.segment_count(), 4);
}

#[test]
fn verify_rejects_segment_gap() {
    let sections = vec![
        Section::new(
            1,
            PartKind::Beginning,
            vec![Segment::new(1, 1, PartKind::Beginning, "Narrator", "a")],
        ),
        Section::new(
            2,
            PartKind::Middle,
            vec![Segment::new(3, 2, PartKind::Middle, "Narrator", "b")],
        ),
    ];
    let story = Story::new(parts(), StoryFormat::Audio { audio_length: 2 }, sections);

    let err = story.verify().unwrap_err();
    assert!(matches!(story_error_kind(&err), StoryErrorKind::ContractViolation(_)));
}

#[test]
fn verify_rejects_undeclared_speaker() {
    let sections = vec![Section::new(
        1,
        PartKind::Beginning,
        vec![Segment::new(1, 1, PartKind::Beginning, "Luna", "Hello")],
    )];
    let story = Story::new(parts(), StoryFormat::Audio { audio_length: 2 }, sections);

    assert!(story.verify().is_err());
}

#[test]
fn replace_segment_changes_only_target_content() {
    let mut story = two_section_story();
    let before = story.segment_list();

    let replacement = story
        .segment(2)
        .expect("segment 2")
        .with_content("Has anyone seen my bone?");
    story.replace_segment(replacement).expect("replace");

    let after = story.segment_list();
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old.segment_number(), new.segment_number());
        assert_eq!(old.speaker(), new.speaker());
        if *old.segment_number() == 2 {
            assert_eq!(new.content(), "Has anyone seen my bone?");
        } else {
            assert_eq!(old, new);
        }
    }
    assert!(story.verify().is_ok());
}

#[test]
fn replace_segment_rejects_speaker_change() {
    let mut story = two_section_story();
    let drifted = Segment::new(2, 1, PartKind::Beginning, "Narrator", "Max looked around.");

    let err = story.replace_segment(drifted).unwrap_err();
    assert!(matches!(story_error_kind(&err), StoryErrorKind::ContractViolation(_)));
    assert_eq!(story.segment(2).map(|s| s.speaker().as_str()), Some("Max"));
}

#[test]
fn replace_segment_rejects_unknown_number() {
    let mut story = two_section_story();
    let stray = Segment::new(99, 1, PartKind::Beginning, "Max", "?");

    let err = story.replace_segment(stray).unwrap_err();
    assert!(matches!(story_error_kind(&err), StoryErrorKind::CallerInputError(_)));
}

#[test]
fn format_requires_matching_payload() {
    assert_eq!(
        StoryFormat::from_request(StoryType::Audio, None, Some(5)).unwrap(),
        StoryFormat::Audio { audio_length: 5 }
    );
    assert!(StoryFormat::from_request(StoryType::Audio, None, None).is_err());
    assert!(StoryFormat::from_request(StoryType::Visual, Some(6), Some(5)).is_err());
    assert!(StoryFormat::from_request(StoryType::Visual, Some(0), None).is_err());
}

#[test]
fn brief_reads_flat_json() -> anyhow::Result<()> {
    let json = r#"{
        "genre": "adventure",
        "reading_level": "grade 2",
        "tone": "playful",
        "description": "A puppy searches for a bone.",
        "speaker_count": 2,
        "story_type": "visual",
        "number_of_panels": 6
    }"#;

    let brief: OutlineBrief = serde_json::from_str(json)?;
    assert_eq!(brief.format().number_of_panels(), Some(6));
    assert_eq!(brief.format().story_type(), StoryType::Visual);
    Ok(())
}

fn brief_json(payload: &str) -> String {
    format!(
        r#"{{
        "genre": "adventure",
        "reading_level": "grade 2",
        "tone": "playful",
        "description": "A puppy searches for a bone.",
        "speaker_count": 2,
        {payload}
    }}"#
    )
}

#[test]
fn brief_rejects_mismatched_payload() -> anyhow::Result<()> {
    let missing_panels = brief_json(r#""story_type": "visual""#);
    let both_payloads =
        brief_json(r#""story_type": "visual", "number_of_panels": 6, "audio_length": 5"#);

    for json in [&missing_panels, &both_payloads] {
        let request: BriefRequest = serde_json::from_str(json)?;
        let err = OutlineBrief::from_request(request).unwrap_err();
        assert!(matches!(story_error_kind(&err), StoryErrorKind::CallerInputError(_)));

        assert!(serde_json::from_str::<OutlineBrief>(json).is_err());
    }
    Ok(())
}

#[test]
fn brief_builder_reports_missing_field() {
    let err = OutlineBrief::builder()
        .genre("adventure")
        .tone("playful")
        .build()
        .unwrap_err();

    assert!(matches!(err.kind(), BuilderErrorKind::MissingField(_)));
}

#[test]
fn request_builder_rejects_out_of_range_temperature() {
    let err = GenerateRequest::builder()
        .messages(vec![Message::user("Write the beginning.")])
        .temperature(3.5f32)
        .build()
        .unwrap_err();

    assert!(matches!(err.kind(), BuilderErrorKind::ValidationFailed(_)));
}
