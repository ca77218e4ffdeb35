// src/lib.rs
pub use config::EvaluatorConfig;
pub use directory::InMemoryDirectory;
pub use error::{ConfigError, DirectoryError, ExtractionError};
pub use evaluator::AccessEvaluator;
pub use traits::DirectoryLookup;
pub use types::*;

pub mod metrics;

mod config;
mod directory;
mod error;
mod evaluator;
mod timers;
mod traits;
mod types;
