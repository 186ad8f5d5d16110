//! Errors raised by generative collaborators.

/// Specific failure conditions of a text or image provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// HTTP/network error
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// Provider returned a non-success status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body
        message: String,
    },
    /// Provider throttled the request
    #[display("Rate limit exceeded")]
    RateLimit,
    /// Response body could not be interpreted
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),
    /// Request could not be expressed for this provider
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Provider did not answer in time
    #[display("Timed out after {}s", _0)]
    Timeout(u64),
    /// Missing credentials or endpoint configuration
    #[display("Provider not configured: {}", _0)]
    NotConfigured(String),
}

/// Provider error with location tracking.
///
/// # Examples
///
/// ```
/// use fabulist_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::RateLimit);
/// assert!(format!("{}", err).contains("Rate limit"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at {}:{}", kind, file, line)]
pub struct ProviderError {
    /// The specific error kind
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
