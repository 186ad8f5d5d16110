//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a message sent to a text collaborator.
///
/// # Examples
///
/// ```
/// use fabulist_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Standing instructions: structural requirements and output format
    System,
    /// The request itself
    User,
    /// Prior model output
    Assistant,
}
