//! Swipe events read off a physical card.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One presentation of a card to a reader.
///
/// Both fields are kept exactly as read. The identifier is opaque to the
/// evaluator, and the credential version (the card's LCC) is only parsed
/// when it is compared against the stored version.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct SwipeEvent {
    pub identifier: String,
    pub credential_version: String,
}

impl SwipeEvent {
    pub fn new(identifier: impl Into<String>, credential_version: impl Into<String>) -> Self {
        SwipeEvent {
            identifier: identifier.into(),
            credential_version: credential_version.into(),
        }
    }
}

/// Only the identifier is rendered; the LCC stays out of log lines.
impl Display for SwipeEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Swipe({})", self.identifier)
    }
}
