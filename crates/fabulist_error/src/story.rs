//! Story generation error types.

use crate::{Violation, ViolationKind};

/// Specific error conditions for story generation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoryErrorKind {
    /// Generated output could not be parsed into the expected shape
    #[display("Malformed output: {}", _0)]
    MalformedOutput(String),
    /// Generated output broke a structural constraint
    #[display("Constraint violation: {}", _0)]
    ConstraintViolation(String),
    /// An invariant the engine must never break was broken
    #[display("Contract violation: {}", _0)]
    ContractViolation(String),
    /// Retry budget consumed without a valid result
    #[display(
        "Generation exhausted for {} after {} attempt(s); last violation: {}",
        request,
        attempts,
        last
    )]
    GenerationExhausted {
        /// Which kind of request ran out of attempts
        request: String,
        /// Attempts made
        attempts: u32,
        /// The violation that ended the final attempt
        last: Violation,
    },
    /// Collaborator timed out or returned an error
    #[display("Provider failure: {}", _0)]
    ProviderFailure(String),
    /// Caller supplied input that can never succeed
    #[display("Invalid input: {}", _0)]
    CallerInputError(String),
}

impl StoryErrorKind {
    /// Whether local bounded retry applies to this condition.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoryErrorKind::MalformedOutput(_)
                | StoryErrorKind::ConstraintViolation(_)
                | StoryErrorKind::ProviderFailure(_)
        )
    }
}

impl From<Violation> for StoryErrorKind {
    fn from(violation: Violation) -> Self {
        let detail = violation.detail;
        match violation.kind {
            ViolationKind::Malformed | ViolationKind::EmptyStructure => {
                StoryErrorKind::MalformedOutput(detail)
            }
            ViolationKind::SpeakerOutsideDeclared
            | ViolationKind::PanelCountMismatch
            | ViolationKind::SpeakerCountOutOfRange => StoryErrorKind::ConstraintViolation(detail),
            ViolationKind::Timeout | ViolationKind::Provider => {
                StoryErrorKind::ProviderFailure(detail)
            }
            ViolationKind::SpeakerDrift | ViolationKind::NumberDrift => {
                StoryErrorKind::ContractViolation(detail)
            }
            ViolationKind::InvalidConstraint => StoryErrorKind::CallerInputError(detail),
        }
    }
}

/// Error type for story generation.
///
/// # Examples
///
/// ```
/// use fabulist_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::ContractViolation("speaker changed".into()));
/// assert!(format!("{}", err).contains("speaker changed"));
/// assert!(!err.kind.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a caller input error.
    #[track_caller]
    pub fn caller_input(message: impl Into<String>) -> Self {
        Self::new(StoryErrorKind::CallerInputError(message.into()))
    }

    /// Shorthand for a contract violation.
    #[track_caller]
    pub fn contract(message: impl Into<String>) -> Self {
        Self::new(StoryErrorKind::ContractViolation(message.into()))
    }
}

impl From<Violation> for StoryError {
    #[track_caller]
    fn from(violation: Violation) -> Self {
        Self::new(violation.into())
    }
}
