//! Directory lookup results and the typed record extracted from them.
//!
//! The directory returns multi-valued attributes keyed by their LDAP-style
//! names:
//! - `uid`: the account name (first value is canonical)
//! - `employeetype`: the stored credential version (LCC)
//! - `memberof_group`: the account's direct group memberships

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ExtractionError;

pub const ACCOUNT_NAME_ATTR: &str = "uid";
pub const CREDENTIAL_VERSION_ATTR: &str = "employeetype";
pub const GROUP_MEMBERSHIP_ATTR: &str = "memberof_group";

static SUMMARY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+)\s+users?\s+matched\s*$").unwrap());

/// What the directory answered for a lookup by identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LookupResponse {
    /// Human readable match summary, e.g. `"1 user matched"`.
    pub summary: String,
    #[serde(rename = "result", default)]
    pub records: Vec<RawRecord>,
}

impl LookupResponse {
    pub fn new(summary: impl Into<String>, records: Vec<RawRecord>) -> Self {
        LookupResponse {
            summary: summary.into(),
            records,
        }
    }

    /// Build a response whose summary agrees with the number of records.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        LookupResponse {
            summary: MatchSummary(records.len()).to_string(),
            records,
        }
    }

    /// The matched record, if and only if the directory reported exactly one
    /// match in its summary and returned exactly one record.
    pub fn single_match(&self) -> Option<&RawRecord> {
        let summary: MatchSummary = self.summary.parse().ok()?;
        match (summary.count(), self.records.as_slice()) {
            (1, [record]) => Some(record),
            _ => None,
        }
    }
}

/// A directory entry as returned, before any validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RawRecord {
    #[serde(rename = "uid", default)]
    pub account_name: Vec<String>,
    #[serde(rename = "employeetype", default)]
    pub credential_version: Vec<String>,
    #[serde(rename = "memberof_group", default)]
    pub groups: Option<Vec<String>>,
}

impl RawRecord {
    pub fn new<S: Into<String>>(
        account_name: impl Into<String>,
        credential_version: impl Into<String>,
        groups: impl IntoIterator<Item = S>,
    ) -> Self {
        RawRecord {
            account_name: vec![account_name.into()],
            credential_version: vec![credential_version.into()],
            groups: Some(groups.into_iter().map(Into::into).collect()),
        }
    }
}

/// The fields the evaluator needs, pulled out of a single matched record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub account_name: String,
    pub stored_credential_version: String,
    pub group_memberships: Vec<String>,
}

impl TryFrom<&RawRecord> for DirectoryRecord {
    type Error = ExtractionError;

    fn try_from(raw: &RawRecord) -> Result<Self, Self::Error> {
        let account_name = first_value(&raw.account_name, ACCOUNT_NAME_ATTR)?;
        let stored_credential_version =
            first_value(&raw.credential_version, CREDENTIAL_VERSION_ATTR)?;
        let group_memberships = raw
            .groups
            .clone()
            .ok_or_else(|| ExtractionError::MissingAttribute(GROUP_MEMBERSHIP_ATTR.to_string()))?;

        Ok(DirectoryRecord {
            account_name,
            stored_credential_version,
            group_memberships,
        })
    }
}

fn first_value(values: &[String], attr: &str) -> Result<String, ExtractionError> {
    let value = values
        .first()
        .ok_or_else(|| ExtractionError::MissingAttribute(attr.to_string()))?;
    if value.trim().is_empty() {
        return Err(ExtractionError::BlankAttribute(attr.to_string()));
    }
    Ok(value.clone())
}

/// The parsed form of a directory summary line such as `"3 users matched"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSummary(usize);

impl MatchSummary {
    pub fn count(&self) -> usize {
        self.0
    }
}

impl FromStr for MatchSummary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SUMMARY_PATTERN
            .captures(s)
            .ok_or_else(|| format!("Unrecognized match summary: '{s}'"))?;
        caps[1]
            .parse::<usize>()
            .map(MatchSummary)
            .map_err(|e| format!("Invalid match count in '{s}': {e}"))
    }
}

impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            1 => write!(f, "1 user matched"),
            n => write!(f, "{n} users matched"),
        }
    }
}
