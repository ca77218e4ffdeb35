//! Evaluator configuration.
//!
//! The evaluator never reads files or the environment; hosts resolve a
//! configuration and hand it over. JSON is accepted for convenience:
//!
//! ```json
//! { "allowed_groups": ["users", "staff"] }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;
use crate::types::AllowedGroups;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Accounts must be a member of at least one of these groups.
    #[serde(default)]
    pub allowed_groups: AllowedGroups,
}

impl EvaluatorConfig {
    pub fn new(allowed_groups: AllowedGroups) -> Self {
        EvaluatorConfig { allowed_groups }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
