//! Bounded retry around one generative call.
//!
//! Each request is driven through an explicit [`GenerationState`] machine by
//! a counted loop. Attempts are strictly sequential so the violation from
//! attempt `k` can be restated to the model in attempt `k + 1`.

use crate::validator::check_constraints;
use derive_getters::Getters;
use fabulist_core::{GenerationConstraints, GenerationKind};
use fabulist_error::{FabulistResult, StoryError, StoryErrorKind, Violation};
use std::future::Future;
use tracing::{debug, error, instrument, warn};

/// Where one generation request is in its lifecycle.
///
/// `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    /// Request received, no call made yet
    Pending,
    /// Collaborator call in flight
    Generating {
        /// 1-based attempt number
        attempt: u32,
    },
    /// Reply received and being checked
    Validating {
        /// 1-based attempt number
        attempt: u32,
    },
    /// Attempt failed and budget remains
    Retrying {
        /// Attempt that failed
        attempt: u32,
        /// Why it failed
        violation: Violation,
    },
    /// A validated value was produced
    Succeeded {
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// Budget exhausted or a non-retryable violation occurred
    Failed {
        /// Attempts used
        attempts: u32,
        /// The violation that ended the request
        violation: Violation,
    },
}

impl GenerationState {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationState::Succeeded { .. } | GenerationState::Failed { .. }
        )
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// A call that times out or errors never reaches validation, so
    /// `Generating` may move straight to `Retrying` or `Failed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabulist_narrative::GenerationState;
    ///
    /// let generating = GenerationState::Generating { attempt: 1 };
    /// assert!(GenerationState::Pending.can_transition_to(&generating));
    /// assert!(!generating.can_transition_to(&GenerationState::Succeeded { attempts: 1 }));
    /// ```
    pub fn can_transition_to(&self, next: &GenerationState) -> bool {
        use GenerationState::*;
        match (self, next) {
            (Pending, Generating { attempt }) => *attempt == 1,
            (Generating { attempt: a }, Validating { attempt: b }) => a == b,
            (Generating { attempt: a }, Retrying { attempt: b, .. }) => a == b,
            (Generating { attempt: a }, Failed { attempts: b, .. }) => a == b,
            (Validating { attempt: a }, Succeeded { attempts: b }) => a == b,
            (Validating { attempt: a }, Retrying { attempt: b, .. }) => a == b,
            (Validating { attempt: a }, Failed { attempts: b, .. }) => a == b,
            (Retrying { attempt: a, .. }, Generating { attempt: b }) => *b == a + 1,
            _ => false,
        }
    }
}

/// A validated value plus the record of how it was obtained.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Generated<T> {
    /// The accepted value
    value: T,
    /// Attempts used, including the successful one
    attempts: u32,
    /// Every state visited, starting at `Pending`
    transitions: Vec<GenerationState>,
}

impl<T> Generated<T> {
    /// Discard the attempt record.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value, keeping the attempt record.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            value: f(self.value),
            attempts: self.attempts,
            transitions: self.transitions,
        }
    }
}

/// Records state transitions and refuses illegal ones.
struct StateTrace {
    current: GenerationState,
    visited: Vec<GenerationState>,
}

impl StateTrace {
    fn new() -> Self {
        Self {
            current: GenerationState::Pending,
            visited: vec![GenerationState::Pending],
        }
    }

    #[track_caller]
    fn advance(&mut self, next: GenerationState) -> FabulistResult<()> {
        if !self.current.can_transition_to(&next) {
            return Err(StoryError::contract(format!(
                "illegal generation transition {:?} -> {:?}",
                self.current, next
            ))
            .into());
        }
        debug!(from = ?self.current, to = ?next, "Generation state transition");
        self.current = next.clone();
        self.visited.push(next);
        Ok(())
    }
}

/// Runs one generative call under a fixed attempt budget.
///
/// # Examples
///
/// ```
/// use fabulist_core::GenerationKind;
/// use fabulist_error::Violation;
/// use fabulist_narrative::RetryingGenerator;
///
/// # tokio_test_block(async {
/// let generator = RetryingGenerator::new(GenerationKind::ScenePlan, 3);
/// let mut replies = vec!["ok", "bad"];
/// let generated = generator
///     .run(
///         |_hint| {
///             let reply = replies.pop().unwrap_or("ok");
///             async move { Ok(reply.to_string()) }
///         },
///         |raw| if raw == "ok" { Ok(raw) } else { Err(Violation::malformed("bad")) },
///     )
///     .await
///     .unwrap();
/// assert_eq!(*generated.attempts(), 2);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RetryingGenerator {
    /// Request kind, used in logs and exhaustion errors
    kind: GenerationKind,
    /// Attempt budget, at least 1
    max_attempts: u32,
    /// Pass the previous violation to the next attempt
    feedback: bool,
}

impl RetryingGenerator {
    /// A generator that feeds the previous violation into each retry.
    pub fn new(kind: GenerationKind, max_attempts: u32) -> Self {
        Self {
            kind,
            max_attempts,
            feedback: true,
        }
    }

    /// A generator for a constrained request.
    ///
    /// # Errors
    ///
    /// Returns `CallerInputError` if the constraints can never be met.
    #[track_caller]
    pub fn from_constraints(constraints: &GenerationConstraints) -> FabulistResult<Self> {
        check_constraints(constraints).map_err(StoryError::from)?;
        Ok(Self::new(*constraints.kind(), *constraints.max_attempts()))
    }

    /// Builder method to toggle retry feedback.
    pub fn with_feedback(mut self, feedback: bool) -> Self {
        self.feedback = feedback;
        self
    }

    /// Drive `generate` then `validate` until a value is accepted or the
    /// budget runs out.
    ///
    /// `generate` receives the previous attempt's violation when feedback is
    /// enabled. A call error, a timeout and a validation failure each consume
    /// one attempt. Non-retryable violations fail at once.
    ///
    /// # Errors
    ///
    /// - The violation's own error kind when it is not retryable
    /// - `GenerationExhausted` with the last violation when the budget runs out
    #[instrument(skip(self, generate, validate), fields(kind = %self.kind, max_attempts = self.max_attempts))]
    pub async fn run<R, T, G, Fut, V>(
        &self,
        mut generate: G,
        mut validate: V,
    ) -> FabulistResult<Generated<T>>
    where
        G: FnMut(Option<Violation>) -> Fut,
        Fut: Future<Output = Result<R, Violation>>,
        V: FnMut(R) -> Result<T, Violation>,
    {
        if self.max_attempts == 0 {
            return Err(StoryError::caller_input(format!(
                "{} request has a zero attempt budget",
                self.kind
            ))
            .into());
        }

        let mut trace = StateTrace::new();
        let mut hint: Option<Violation> = None;

        for attempt in 1..=self.max_attempts {
            trace.advance(GenerationState::Generating { attempt })?;

            let outcome = match generate(hint.take()).await {
                Ok(raw) => {
                    trace.advance(GenerationState::Validating { attempt })?;
                    validate(raw)
                }
                Err(violation) => Err(violation),
            };

            let violation = match outcome {
                Ok(value) => {
                    trace.advance(GenerationState::Succeeded { attempts: attempt })?;
                    if attempt > 1 {
                        debug!(attempt, "Generation succeeded after retry");
                    }
                    return Ok(Generated {
                        value,
                        attempts: attempt,
                        transitions: trace.visited,
                    });
                }
                Err(violation) => violation,
            };

            let fatal = StoryError::from(violation.clone());
            if !fatal.kind.is_retryable() {
                if violation.kind.is_contract_breach() {
                    error!(attempt, %violation, "Contract breach, failing immediately");
                } else {
                    error!(attempt, %violation, "Non-retryable violation, failing immediately");
                }
                trace.advance(GenerationState::Failed {
                    attempts: attempt,
                    violation,
                })?;
                return Err(fatal.into());
            }

            if attempt == self.max_attempts {
                error!(attempt, %violation, "All generation attempts exhausted");
                trace.advance(GenerationState::Failed {
                    attempts: attempt,
                    violation: violation.clone(),
                })?;
                return Err(StoryError::new(StoryErrorKind::GenerationExhausted {
                    request: self.kind.to_string(),
                    attempts: attempt,
                    last: violation,
                })
                .into());
            }

            warn!(attempt, %violation, "Generation attempt rejected, retrying");
            trace.advance(GenerationState::Retrying {
                attempt,
                violation: violation.clone(),
            })?;
            if self.feedback {
                hint = Some(violation);
            }
        }

        // The loop returns on its final iteration.
        Err(StoryError::contract(format!("{} retry loop ended without an outcome", self.kind)).into())
    }
}
