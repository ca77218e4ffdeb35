use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a [`DirectoryLookup`](crate::DirectoryLookup) implementation.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("directory query failed: {0}")]
    Query(String),

    #[error("credential update failed for {account}: {message}")]
    Update { account: String, message: String },
}

/// Errors raised while pulling typed fields out of a matched directory record.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("record has no value for attribute '{0}'")]
    MissingAttribute(String),

    #[error("record attribute '{0}' is blank")]
    BlankAttribute(String),
}

/// Errors raised while resolving evaluator configuration.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("allowed group list is empty")]
    EmptyAllowList,

    #[error("invalid group name: '{0}'")]
    InvalidGroupName(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
