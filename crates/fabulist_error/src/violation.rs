//! Structural validation outcomes.

/// What a structural check found wrong with one generation attempt.
///
/// The kind decides the retry policy: model defects are retried, while
/// contract breaches and invalid caller constraints fail immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ViolationKind {
    /// Output could not be parsed into the expected shape
    #[display("malformed output")]
    Malformed,
    /// Output parsed but contained no sections, segments or content
    #[display("empty structure")]
    EmptyStructure,
    /// A segment names a speaker outside the declared set
    #[display("speaker outside declared set")]
    SpeakerOutsideDeclared,
    /// Illustration or scene count differs from the requested panel count
    #[display("panel count mismatch")]
    PanelCountMismatch,
    /// Number of distinct speakers used falls outside the allowed range
    #[display("speaker count out of range")]
    SpeakerCountOutOfRange,
    /// The collaborator did not answer within its timeout
    #[display("timeout")]
    Timeout,
    /// The collaborator returned an error
    #[display("provider error")]
    Provider,
    /// A regenerated segment changed speaker
    #[display("speaker drift")]
    SpeakerDrift,
    /// A regenerated segment changed number, or a number was reused
    #[display("number drift")]
    NumberDrift,
    /// A caller-supplied constraint is itself invalid
    #[display("invalid constraint")]
    InvalidConstraint,
}

impl ViolationKind {
    /// Whether the violation is a breach of an invariant the engine guarantees.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabulist_error::ViolationKind;
    ///
    /// assert!(ViolationKind::NumberDrift.is_contract_breach());
    /// assert!(!ViolationKind::InvalidConstraint.is_contract_breach());
    /// ```
    pub fn is_contract_breach(&self) -> bool {
        matches!(self, ViolationKind::SpeakerDrift | ViolationKind::NumberDrift)
    }
}

/// A single failed check, with a human-readable detail.
///
/// The detail is phrased so it can be restated to the model as a hint on
/// the next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}: {}", kind, detail)]
pub struct Violation {
    /// Category of the failure
    pub kind: ViolationKind,
    /// What exactly was wrong
    pub detail: String,
}

impl Violation {
    /// Create a violation of the given kind.
    pub fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Output did not parse.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ViolationKind::Malformed, detail)
    }

    /// Collaborator call timed out.
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ViolationKind::Timeout, detail)
    }

    /// Collaborator call failed.
    pub fn provider(detail: impl Into<String>) -> Self {
        Self::new(ViolationKind::Provider, detail)
    }
}
