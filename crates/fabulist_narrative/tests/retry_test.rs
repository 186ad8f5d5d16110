use fabulist_core::GenerationKind;
use fabulist_error::{StoryErrorKind, Violation, ViolationKind};
use fabulist_narrative::{GenerationState, RetryingGenerator};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_success_on_first_attempt_records_transitions() -> anyhow::Result<()> {
    let generator = RetryingGenerator::new(GenerationKind::Outline, 3);

    let generated = generator
        .run(|_hint| async { Ok::<_, Violation>(7u32) }, |n| Ok(n * 2))
        .await?;

    assert_eq!(*generated.value(), 14);
    assert_eq!(*generated.attempts(), 1);
    assert_eq!(
        generated.transitions(),
        &vec![
            GenerationState::Pending,
            GenerationState::Generating { attempt: 1 },
            GenerationState::Validating { attempt: 1 },
            GenerationState::Succeeded { attempts: 1 },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_feedback_carries_previous_violation() -> anyhow::Result<()> {
    let hints: Arc<Mutex<Vec<Option<Violation>>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = hints.clone();
    let generator = RetryingGenerator::new(GenerationKind::ScenePlan, 3);

    let generated = generator
        .run(
            move |hint| {
                let mut seen = seen.lock().unwrap();
                seen.push(hint);
                let attempt = seen.len();
                async move { Ok::<_, Violation>(attempt) }
            },
            |attempt| {
                if attempt < 3 {
                    Err(Violation::new(
                        ViolationKind::PanelCountMismatch,
                        format!("expected 6 scenes, got {}", attempt),
                    ))
                } else {
                    Ok(attempt)
                }
            },
        )
        .await?;

    assert_eq!(*generated.attempts(), 3);
    let hints = hints.lock().unwrap();
    assert_eq!(hints[0], None);
    assert_eq!(
        hints[1].as_ref().map(|v| v.detail.as_str()),
        Some("expected 6 scenes, got 1")
    );
    assert_eq!(
        hints[2].as_ref().map(|v| v.detail.as_str()),
        Some("expected 6 scenes, got 2")
    );
    Ok(())
}

#[tokio::test]
async fn test_feedback_can_be_disabled() -> anyhow::Result<()> {
    let hints: Arc<Mutex<Vec<Option<Violation>>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = hints.clone();
    let generator = RetryingGenerator::new(GenerationKind::Segment, 2).with_feedback(false);

    let _ = generator
        .run(
            move |hint| {
                seen.lock().unwrap().push(hint);
                async { Err::<(), _>(Violation::timeout("elapsed")) }
            },
            Ok,
        )
        .await;

    assert!(hints.lock().unwrap().iter().all(Option::is_none));
    Ok(())
}

#[tokio::test]
async fn test_exhaustion_reports_last_violation() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = calls.clone();
    let generator = RetryingGenerator::new(GenerationKind::PanelImage, 3);

    let err = generator
        .run(
            move |_hint| {
                *counter.lock().unwrap() += 1;
                async { Err::<(), _>(Violation::provider("503 from upstream")) }
            },
            Ok,
        )
        .await
        .unwrap_err();

    assert_eq!(*calls.lock().unwrap(), 3);
    match &err.as_story().expect("story error").kind {
        StoryErrorKind::GenerationExhausted {
            request,
            attempts,
            last,
        } => {
            assert_eq!(request, "panel_image");
            assert_eq!(*attempts, 3);
            assert_eq!(last, &Violation::provider("503 from upstream"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_contract_breach_stops_immediately() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = calls.clone();
    let generator = RetryingGenerator::new(GenerationKind::Segment, 3);

    let err = generator
        .run(
            move |_hint| {
                *counter.lock().unwrap() += 1;
                async { Ok::<_, Violation>("reply") }
            },
            |_reply| -> Result<(), Violation> {
                Err(Violation::new(ViolationKind::SpeakerDrift, "Max became Narrator"))
            },
        )
        .await
        .unwrap_err();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::ContractViolation(_)
    ));
}

#[tokio::test]
async fn test_invalid_constraint_stops_immediately() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = calls.clone();
    let generator = RetryingGenerator::new(GenerationKind::StoryPart, 3);

    let err = generator
        .run(
            move |_hint| {
                *counter.lock().unwrap() += 1;
                async { Ok::<_, Violation>("reply") }
            },
            |_reply| -> Result<(), Violation> {
                Err(Violation::new(ViolationKind::InvalidConstraint, "max speakers 5"))
            },
        )
        .await
        .unwrap_err();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(matches!(
        err.as_story().expect("story error").kind,
        StoryErrorKind::CallerInputError(_)
    ));
}

#[test]
fn test_state_machine_transitions() {
    let violation = Violation::malformed("not json");
    let pending = GenerationState::Pending;
    let generating = GenerationState::Generating { attempt: 1 };
    let validating = GenerationState::Validating { attempt: 1 };
    let retrying = GenerationState::Retrying {
        attempt: 1,
        violation: violation.clone(),
    };

    assert!(pending.can_transition_to(&generating));
    assert!(generating.can_transition_to(&validating));
    assert!(generating.can_transition_to(&retrying));
    assert!(validating.can_transition_to(&retrying));
    assert!(retrying.can_transition_to(&GenerationState::Generating { attempt: 2 }));
    assert!(validating.can_transition_to(&GenerationState::Succeeded { attempts: 1 }));

    assert!(!pending.can_transition_to(&validating));
    assert!(!retrying.can_transition_to(&GenerationState::Generating { attempt: 1 }));
    assert!(!generating.can_transition_to(&GenerationState::Succeeded { attempts: 1 }));

    let failed = GenerationState::Failed {
        attempts: 3,
        violation,
    };
    assert!(failed.is_terminal());
    assert!(GenerationState::Succeeded { attempts: 1 }.is_terminal());
    assert!(!retrying.is_terminal());
    assert!(!failed.can_transition_to(&GenerationState::Generating { attempt: 4 }));
}
