use fabulist_error::{
    FabulistError, FabulistErrorKind, StoryError, StoryErrorKind, Violation, ViolationKind,
};

#[test]
fn model_defects_map_to_retryable_kinds() {
    let malformed: StoryErrorKind = Violation::malformed("not json").into();
    assert!(matches!(malformed, StoryErrorKind::MalformedOutput(_)));
    assert!(malformed.is_retryable());

    let panels: StoryErrorKind =
        Violation::new(ViolationKind::PanelCountMismatch, "expected 6, got 5").into();
    assert!(matches!(panels, StoryErrorKind::ConstraintViolation(_)));
    assert!(panels.is_retryable());

    let timeout: StoryErrorKind = Violation::timeout("30s elapsed").into();
    assert!(matches!(timeout, StoryErrorKind::ProviderFailure(_)));
    assert!(timeout.is_retryable());
}

#[test]
fn contract_breaches_are_fatal() {
    let drift: StoryErrorKind =
        Violation::new(ViolationKind::SpeakerDrift, "Max became Narrator").into();
    assert!(matches!(drift, StoryErrorKind::ContractViolation(_)));
    assert!(!drift.is_retryable());
    assert!(ViolationKind::SpeakerDrift.is_contract_breach());
    assert!(!ViolationKind::InvalidConstraint.is_contract_breach());
}

#[test]
fn invalid_constraint_is_caller_error() {
    let kind: StoryErrorKind =
        Violation::new(ViolationKind::InvalidConstraint, "max speakers 5").into();
    assert!(matches!(kind, StoryErrorKind::CallerInputError(_)));
    assert!(!kind.is_retryable());
}

#[test]
fn exhaustion_carries_last_violation() {
    let last = Violation::new(ViolationKind::PanelCountMismatch, "expected 6 scenes, got 4");
    let err = StoryError::new(StoryErrorKind::GenerationExhausted {
        request: "scene_plan".to_string(),
        attempts: 3,
        last: last.clone(),
    });

    let message = err.to_string();
    assert!(message.contains("3 attempt(s)"));
    assert!(message.contains("expected 6 scenes, got 4"));
    assert!(!err.kind.is_retryable());

    match &err.kind {
        StoryErrorKind::GenerationExhausted { last: got, .. } => assert_eq!(got, &last),
        other => panic!("unexpected kind: {other}"),
    }
}

#[test]
fn story_errors_lift_into_top_level() {
    let err: FabulistError = StoryError::caller_input("number_of_speakers = 5").into();
    assert!(matches!(err.kind(), FabulistErrorKind::Story(_)));
    let story = err.as_story().expect("story error");
    assert!(matches!(story.kind, StoryErrorKind::CallerInputError(_)));
    assert!(story.file.ends_with(".rs"));
}
