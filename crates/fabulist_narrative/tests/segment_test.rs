mod test_utils;

use fabulist_core::{PartKind, Section, Segment, Story, StoryFormat};
use fabulist_error::StoryErrorKind;
use fabulist_narrative::{SegmentRegenerator, StoryEngine};
use std::sync::Arc;
use test_utils::*;

fn story() -> Story {
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
            vec![Segment::new(3, 2, PartKind::Middle, "Narrator", "He dug by the fence.")],
        ),
        Section::new(
            3,
            PartKind::End,
            vec![Segment::new(4, 3, PartKind::End, "Max", "Found it!")],
        ),
    ];
    Story::new(puppy_parts(), StoryFormat::Visual { number_of_panels: 3 }, sections)
}

#[tokio::test]
async fn test_regeneration_preserves_every_other_segment() -> anyhow::Result<()> {
    let text = MockTextDriver::new_success(segment_reply(2, "Max", "Has anyone seen my bone?"));
    let engine = StoryEngine::new(text, MockImageDriver::new_success(), test_config())?;
    let mut story = story();
    let before = story.segment_list();

    let replacement = engine
        .regenerate_segment(&story, 2, "make Max sound worried", Some("playful"))
        .await?;
    assert_eq!(*replacement.segment_number(), 2);
    assert_eq!(replacement.speaker(), "Max");
    assert_eq!(replacement.content(), "Has anyone seen my bone?");

    story.replace_segment(replacement)?;
    story.verify()?;
    for (old, new) in before.iter().zip(story.segments()) {
        if *old.segment_number() != 2 {
            assert_eq!(old, new);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_context_and_target_reach_the_model() -> anyhow::Result<()> {
    let text = Arc::new(MockTextDriver::new_success(segment_reply(3, "Narrator", "He dug and dug.")));
    let engine = StoryEngine::new(text.clone(), MockImageDriver::new_success(), test_config())?;

    engine
        .regenerate_segment(&story(), 3, "more digging", None)
        .await?;

    let prompt = text.requests()[0]
        .messages()
        .iter()
        .map(|m| m.text_content())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(prompt.contains("Max woke early."));
    assert!(prompt.contains("Found it!"));
    assert!(prompt.contains(">> [3] Narrator"));
    assert!(prompt.contains("more digging"));
    Ok(())
}

#[tokio::test]
async fn test_speaker_drift_fails_without_retry() -> anyhow::Result<()> {
    let text = Arc::new(MockTextDriver::new_success(segment_reply(2, "Narrator", "Max looked around.")));
    let engine = StoryEngine::new(text.clone(), MockImageDriver::new_success(), test_config())?;

    let err = engine
        .regenerate_segment(&story(), 2, "more suspense", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::ContractViolation(_)
    ));
    assert_eq!(text.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_number_drift_fails_without_retry() -> anyhow::Result<()> {
    let text = Arc::new(MockTextDriver::new_success(segment_reply(5, "Max", "Woof.")));
    let engine = StoryEngine::new(text.clone(), MockImageDriver::new_success(), test_config())?;

    let err = engine
        .regenerate_segment(&story(), 2, "shorter", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::ContractViolation(_)
    ));
    assert_eq!(text.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_malformed_reply_gets_bounded_retry() -> anyhow::Result<()> {
    let text = Arc::new(MockTextDriver::new_sequence(vec![
        MockReply::text("Sure, here's a better line: Max barks."),
        MockReply::text(segment_reply(2, "Max", "")),
        MockReply::text(segment_reply(2, "Max", "Bone? Bone!")),
    ]));
    let config = test_config();
    let story = story();
    let part = story.part(PartKind::Beginning).expect("beginning part");

    let generated = SegmentRegenerator::new(text.as_ref(), &config)
        .regenerate(&story.segment_list(), 2, "more excited", part, Some("playful"))
        .await?;

    assert_eq!(*generated.attempts(), 3);
    assert_eq!(generated.value().content(), "Bone? Bone!");
    Ok(())
}

#[tokio::test]
async fn test_unknown_target_rejected_before_any_call() -> anyhow::Result<()> {
    let text = Arc::new(MockTextDriver::new_success(segment_reply(9, "Max", "?")));
    let engine = StoryEngine::new(text.clone(), MockImageDriver::new_success(), test_config())?;

    let err = engine
        .regenerate_segment(&story(), 9, "anything", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::CallerInputError(_)
    ));

    let err = engine
        .regenerate_segment(&story(), 2, "   ", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::CallerInputError(_)
    ));

    assert_eq!(text.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_numbers_are_a_contract_violation() -> anyhow::Result<()> {
    let text = Arc::new(MockTextDriver::new_success(segment_reply(1, "Narrator", "Hi.")));
    let config = test_config();
    let segments = vec![
        Segment::new(1, 1, PartKind::Beginning, "Narrator", "One."),
        Segment::new(1, 1, PartKind::Beginning, "Max", "Also one."),
    ];
    let parts = puppy_parts();

    let err = SegmentRegenerator::new(text.as_ref(), &config)
        .regenerate(&segments, 1, "shorter", &parts[0], None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::ContractViolation(_)
    ));
    assert_eq!(text.call_count(), 0);
    Ok(())
}
