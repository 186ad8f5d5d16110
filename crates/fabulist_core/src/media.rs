//! Media source types for image payloads.

use serde::{Deserialize, Serialize};

/// Where image content lives.
///
/// # Examples
///
/// ```
/// use fabulist_core::MediaSource;
///
/// let url = MediaSource::Url("https://example.com/panel-1.png".to_string());
/// let binary = MediaSource::Binary(vec![0x89, 0x50, 0x4E, 0x47]);
/// assert!(!url.is_empty());
/// assert!(MediaSource::Base64(String::new()).is_empty());
/// # let _ = binary;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// URL to fetch the content from
    Url(String),
    /// Base64-encoded content
    Base64(String),
    /// Raw binary data
    Binary(Vec<u8>),
}

impl MediaSource {
    /// True when the source carries no content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            MediaSource::Url(url) => url.trim().is_empty(),
            MediaSource::Base64(data) => data.trim().is_empty(),
            MediaSource::Binary(bytes) => bytes.is_empty(),
        }
    }
}
