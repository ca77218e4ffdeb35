//! Data types for swipe evaluation.
//!
//! - [`SwipeEvent`]: what the reader saw
//! - [`LookupResponse`] / [`RawRecord`]: what the directory answered
//! - [`DirectoryRecord`]: the typed fields pulled from a single match
//! - [`AccessDecision`]: what the evaluator concluded

mod decision;
mod groups;
mod record;
mod swipe;
mod version;

pub use decision::{AccessDecision, Reason, UpdateOutcome, UpdateRequest};
pub use groups::{AllowedGroups, DEFAULT_ALLOWED_GROUP};
pub use record::{
    ACCOUNT_NAME_ATTR, CREDENTIAL_VERSION_ATTR, DirectoryRecord, GROUP_MEMBERSHIP_ATTR,
    LookupResponse, MatchSummary, RawRecord,
};
pub use swipe::SwipeEvent;
pub use version::{CredentialVersion, VersionParseError};
