//! Output types from text collaborator responses.

use serde::{Deserialize, Serialize};

/// What a text collaborator returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Structured JSON output (providers with a native JSON mode).
    Json(serde_json::Value),
}
