use fabulist_core::{
    GenerationConstraints, GenerationKind, Illustration, MediaSource, PartKind, Segment,
    StoryFormat,
};
use fabulist_error::ViolationKind;
use fabulist_narrative::{
    LengthTarget, check_constraints, extract_json, length_targets, parse_reply, validate_outline_output,
    validate_scene_output, validate_segment_output, validate_story_output, verify_illustrations,
};

fn part_constraints() -> GenerationConstraints {
    GenerationConstraints::new(GenerationKind::StoryPart, 3).with_speakers(["Narrator", "Max"])
}

#[test]
fn test_story_output_accepts_fenced_reply() {
    let raw = "```json\n{\"sections\":[{\"segments\":[{\"speaker\":\" Max \",\"content\":\"Woof!\"}]}]}\n```";
    let draft = validate_story_output(raw, &part_constraints()).unwrap();
    assert_eq!(draft.sections[0].segments[0].speaker, "Max");
}

#[test]
fn test_story_output_checks_in_order() {
    let constraints = part_constraints();

    let malformed = validate_story_output("no json at all", &constraints).unwrap_err();
    assert_eq!(malformed.kind, ViolationKind::Malformed);

    let wrong_shape = validate_story_output(r#"{"scenes": ["a"]}"#, &constraints).unwrap_err();
    assert_eq!(wrong_shape.kind, ViolationKind::Malformed);

    let empty = validate_story_output(r#"{"sections": []}"#, &constraints).unwrap_err();
    assert_eq!(empty.kind, ViolationKind::EmptyStructure);

    let empty_section =
        validate_story_output(r#"{"sections": [{"segments": []}]}"#, &constraints).unwrap_err();
    assert_eq!(empty_section.kind, ViolationKind::EmptyStructure);

    let stray = validate_story_output(
        r#"{"sections":[{"segments":[{"speaker":"Narrator","content":"a"},{"speaker":"Luna","content":"b"}]}]}"#,
        &constraints,
    )
    .unwrap_err();
    assert_eq!(stray.kind, ViolationKind::SpeakerOutsideDeclared);
    assert!(stray.detail.contains("Luna"));
}

#[test]
fn test_speaker_count_ceiling() {
    let constraints = GenerationConstraints::new(GenerationKind::StoryPart, 3)
        .with_speakers(["Narrator", "Max", "Luna"])
        .with_max_speakers(2);
    let raw = r#"{"sections":[{"segments":[
        {"speaker":"Narrator","content":"a"},
        {"speaker":"Max","content":"b"},
        {"speaker":"Luna","content":"c"}
    ]}]}"#;

    let violation = validate_story_output(raw, &constraints).unwrap_err();
    assert_eq!(violation.kind, ViolationKind::SpeakerCountOutOfRange);
}

#[test]
fn test_scene_count_must_match_exactly() {
    let constraints = GenerationConstraints::new(GenerationKind::ScenePlan, 3).with_expected_panels(3);

    let scenes = validate_scene_output(r#"{"scenes":["a","b","c"]}"#, &constraints).unwrap();
    assert_eq!(scenes.len(), 3);

    for raw in [r#"{"scenes":["a","b"]}"#, r#"{"scenes":["a","b","c","d"]}"#] {
        let violation = validate_scene_output(raw, &constraints).unwrap_err();
        assert_eq!(violation.kind, ViolationKind::PanelCountMismatch);
    }
}

#[test]
fn test_outline_requires_three_parts() {
    let constraints = GenerationConstraints::new(GenerationKind::Outline, 3).with_max_speakers(2);
    let raw = r#"{"parts":[
        {"part_kind":"beginning","summary":"a","declared_speakers":["Narrator"]},
        {"part_kind":"middle","summary":"b","declared_speakers":["Narrator"]}
    ]}"#;

    let violation = validate_outline_output(raw, &constraints).unwrap_err();
    assert_eq!(violation.kind, ViolationKind::EmptyStructure);
}

#[test]
fn test_segment_output_preserves_identity() {
    let original = Segment::new(4, 2, PartKind::Middle, "Max", "Not here!");

    let replaced =
        validate_segment_output(r#"{"speaker":"Max","content":"Nope, not here."}"#, &original)
            .unwrap();
    assert_eq!(*replaced.segment_number(), 4);
    assert_eq!(*replaced.section_number(), 2);
    assert_eq!(replaced.content(), "Nope, not here.");

    let drift = validate_segment_output(
        r#"{"segment_number":4,"speaker":"Narrator","content":"x"}"#,
        &original,
    )
    .unwrap_err();
    assert_eq!(drift.kind, ViolationKind::SpeakerDrift);
    assert!(drift.kind.is_contract_breach());
}

#[test]
fn test_invalid_constraints_are_caller_errors() {
    let too_many = GenerationConstraints::new(GenerationKind::StoryPart, 3)
        .with_speakers(["A"])
        .with_max_speakers(5);
    assert_eq!(
        check_constraints(&too_many).unwrap_err().kind,
        ViolationKind::InvalidConstraint
    );

    let no_speakers = GenerationConstraints::new(GenerationKind::StoryPart, 3);
    assert!(check_constraints(&no_speakers).is_err());

    let no_panels = GenerationConstraints::new(GenerationKind::ScenePlan, 3);
    assert!(check_constraints(&no_panels).is_err());

    let no_attempts = GenerationConstraints::new(GenerationKind::Outline, 0);
    assert!(check_constraints(&no_attempts).is_err());

    assert!(check_constraints(&part_constraints()).is_ok());
}

#[test]
fn test_illustration_batch_must_be_complete() {
    let panel = |n| Illustration::new(n, n, "scene", None, MediaSource::Binary(vec![1]));

    assert!(verify_illustrations(&[panel(1), panel(2), panel(3)], 3).is_ok());
    assert!(verify_illustrations(&[panel(1), panel(2)], 3).is_err());
    assert!(verify_illustrations(&[panel(2), panel(1)], 2).is_err());
}

#[test]
fn test_extract_json_strategies() {
    assert_eq!(
        extract_json("Sure!\n```\n{\"a\": 1}\n```").unwrap(),
        "{\"a\": 1}"
    );
    assert_eq!(
        extract_json("prefix {\"a\": \"}\"} suffix").unwrap(),
        "{\"a\": \"}\"}"
    );
    assert_eq!(extract_json("list: [1, [2, 3]] done").unwrap(), "[1, [2, 3]]");
    assert_eq!(
        extract_json("nothing here").unwrap_err().kind,
        ViolationKind::Malformed
    );
    assert_eq!(
        extract_json("```json {\"a\": 1} ```\nHope this helps!").unwrap(),
        "{\"a\": 1}"
    );
    assert_eq!(
        extract_json("[Part 1] {\"a\": [2]}").unwrap(),
        "{\"a\": [2]}"
    );
}

#[test]
fn test_story_output_recovers_json_after_chatter() {
    let one_line = "```json {\"sections\":[{\"segments\":[{\"speaker\":\"Max\",\"content\":\"Woof!\"}]}]} ```\nHope this helps!";
    let draft = validate_story_output(one_line, &part_constraints()).unwrap();
    assert_eq!(draft.sections[0].segments[0].content, "Woof!");

    let labelled = "[Part 1] {\"sections\":[{\"segments\":[{\"speaker\":\"Narrator\",\"content\":\"Once upon a time.\"}]}]}";
    let draft = validate_story_output(labelled, &part_constraints()).unwrap();
    assert_eq!(draft.sections[0].segments[0].speaker, "Narrator");
}

#[test]
fn test_parse_reply_skips_candidates_of_wrong_shape() {
    #[derive(serde::Deserialize)]
    struct Scenes {
        scenes: Vec<String>,
    }

    let reply = "Plan {\"note\": \"draft\"} then {\"scenes\": [\"Max digs\"]}";
    let parsed: Scenes = parse_reply(reply).unwrap();
    assert_eq!(parsed.scenes, vec!["Max digs".to_string()]);

    let err = parse_reply::<Scenes>("{\"note\": \"draft\"}").err().unwrap();
    assert_eq!(err.kind, ViolationKind::Malformed);
}

#[test]
fn test_length_targets_cover_budget() {
    let visual = length_targets(&StoryFormat::Visual { number_of_panels: 7 }, 150);
    assert_eq!(
        visual,
        [
            LengthTarget::Sections(3),
            LengthTarget::Sections(2),
            LengthTarget::Sections(2)
        ]
    );

    let tiny = length_targets(&StoryFormat::Visual { number_of_panels: 1 }, 150);
    assert!(tiny.iter().all(|t| *t == LengthTarget::Sections(1)));

    let audio = length_targets(&StoryFormat::Audio { audio_length: 2 }, 150);
    assert_eq!(
        audio,
        [
            LengthTarget::Words(100),
            LengthTarget::Words(100),
            LengthTarget::Words(100)
        ]
    );
}
