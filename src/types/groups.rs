//! Allow-listed directory groups.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;

/// The group an account must belong to when nothing else is configured.
pub const DEFAULT_ALLOWED_GROUP: &str = "users";

/// The set of group names whose members may be granted access.
///
/// Names are compared exactly (case-sensitive) against the directory's
/// group memberships.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AllowedGroups(BTreeSet<String>);

impl AllowedGroups {
    /// Build an allow-list from group names. Names are trimmed; blank names
    /// and an empty result are rejected.
    pub fn new<I, S>(groups: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for group in groups {
            let name = group.as_ref().trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidGroupName(group.as_ref().to_string()));
            }
            set.insert(name.to_string());
        }
        if set.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }
        Ok(AllowedGroups(set))
    }

    /// True if any of `memberships` is on the allow-list.
    pub fn intersects<I, S>(&self, memberships: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        memberships
            .into_iter()
            .any(|group| self.0.contains(group.as_ref()))
    }

    pub fn contains(&self, group: &str) -> bool {
        self.0.contains(group)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for AllowedGroups {
    fn default() -> Self {
        AllowedGroups(BTreeSet::from([DEFAULT_ALLOWED_GROUP.to_string()]))
    }
}

impl Display for AllowedGroups {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

/// Parses a comma separated list, e.g. `"users, staff"`.
impl FromStr for AllowedGroups {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = s.split(',').filter(|p| !p.trim().is_empty()).collect();
        AllowedGroups::new(names)
    }
}

impl TryFrom<Vec<String>> for AllowedGroups {
    type Error = ConfigError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        AllowedGroups::new(value)
    }
}

impl From<AllowedGroups> for Vec<String> {
    fn from(value: AllowedGroups) -> Self {
        value.0.into_iter().collect()
    }
}
