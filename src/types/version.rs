//! Numeric credential versions (LCC).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A parsed credential version. Ordering is numeric, so `"10" > "9"`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct CredentialVersion(u64);

impl CredentialVersion {
    pub fn new(value: u64) -> Self {
        CredentialVersion(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{input}' is not a valid credential version")]
pub struct VersionParseError {
    pub input: String,
}

impl FromStr for CredentialVersion {
    type Err = VersionParseError;

    /// Surrounding ASCII whitespace is ignored. Anything else that is not a
    /// non-negative integer fitting in 64 bits is rejected, including signed
    /// values such as `"+3"` or `"-1"` and numbers past `u64::MAX`. Those
    /// deny access rather than being interpreted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_ascii();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionParseError {
                input: s.to_string(),
            });
        }
        trimmed
            .parse::<u64>()
            .map(CredentialVersion)
            .map_err(|_| VersionParseError {
                input: s.to_string(),
            })
    }
}

impl Display for CredentialVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
