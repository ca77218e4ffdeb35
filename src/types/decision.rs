//! Access decisions and their causes.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Why a swipe was granted or denied.
///
/// Every variant other than `Granted` is terminal and implies a denial.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ToSchema,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Reason {
    Granted,
    /// The lookup did not resolve to exactly one record.
    AmbiguousOrNoMatch,
    /// The matched record lacks a required attribute.
    RecordMalformed,
    /// None of the account's groups are on the allow-list.
    NotInAllowedGroup,
    /// Either the swiped or the stored LCC is not a number.
    VersionParseFailure,
    /// The swiped LCC is older than the stored one.
    StaleCredential,
    /// The directory could not be queried.
    DirectoryError,
}

impl Reason {
    pub fn is_granted(&self) -> bool {
        matches!(self, Reason::Granted)
    }
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

/// A request to move an account's stored LCC forward.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct UpdateRequest {
    pub account_name: String,
    pub new_credential_version: String,
}

/// How the directory answered an [`UpdateRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub enum UpdateOutcome {
    Applied,
    /// The update did not go through. The grant stands regardless.
    Failed { message: String },
}

/// The result of evaluating one swipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct AccessDecision {
    pub granted: bool,
    pub reason: Reason,
    /// Set only when access was granted to a card newer than the stored LCC.
    pub update: Option<UpdateRequest>,
    pub update_outcome: Option<UpdateOutcome>,
}

impl AccessDecision {
    pub fn deny(reason: Reason) -> Self {
        debug_assert!(!reason.is_granted());
        AccessDecision {
            granted: false,
            reason,
            update: None,
            update_outcome: None,
        }
    }

    pub fn grant() -> Self {
        AccessDecision {
            granted: true,
            reason: Reason::Granted,
            update: None,
            update_outcome: None,
        }
    }

    pub fn grant_with_update(update: UpdateRequest, outcome: UpdateOutcome) -> Self {
        AccessDecision {
            granted: true,
            reason: Reason::Granted,
            update: Some(update),
            update_outcome: Some(outcome),
        }
    }

    /// True if an update was attempted for this grant and the directory rejected it.
    pub fn update_failed(&self) -> bool {
        matches!(self.update_outcome, Some(UpdateOutcome::Failed { .. }))
    }
}

impl Display for AccessDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !self.granted {
            return write!(f, "Deny({})", self.reason);
        }
        match (&self.update, &self.update_outcome) {
            (Some(update), Some(UpdateOutcome::Applied)) => write!(
                f,
                "Grant(updated {} to {})",
                update.account_name, update.new_credential_version
            ),
            (Some(update), Some(UpdateOutcome::Failed { .. })) => write!(
                f,
                "Grant(update of {} failed)",
                update.account_name
            ),
            _ => write!(f, "Grant"),
        }
    }
}
