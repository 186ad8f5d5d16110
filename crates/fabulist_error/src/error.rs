//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, JsonError, ProviderError, StoryError};

/// Every error condition the Fabulist crates can report.
///
/// # Examples
///
/// ```
/// use fabulist_error::{FabulistError, ConfigError};
///
/// let err: FabulistError = ConfigError::new("bad timeout").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulistErrorKind {
    /// Story generation error
    #[from(StoryError)]
    Story(StoryError),
    /// Collaborator error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Fabulist error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabulist Error: {}", _0)]
pub struct FabulistError(Box<FabulistErrorKind>);

impl FabulistError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulistErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulistErrorKind {
        &self.0
    }

    /// The story error inside, if this is one.
    pub fn as_story(&self) -> Option<&StoryError> {
        match self.kind() {
            FabulistErrorKind::Story(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FabulistErrorKind
impl<T> From<T> for FabulistError
where
    T: Into<FabulistErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabulist operations.
pub type FabulistResult<T> = std::result::Result<T, FabulistError>;
