//! Vendor-agnostic metrics via a pluggable sink.
//!
//! Each [`AccessEvaluator`](crate::AccessEvaluator) carries its own sink,
//! so hosts can route counts to Prometheus, OpenTelemetry or anything else
//! without the library knowing. The default sink drops everything.
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use lcc_gate_core::metrics::{EvaluationStats, MetricsSink, UpdateStats};
//!
//! #[derive(Default)]
//! struct Counters {
//!     denies: AtomicU64,
//! }
//!
//! impl MetricsSink for Counters {
//!     fn on_evaluation(&self, stats: &EvaluationStats) {
//!         if !stats.granted {
//!             self.denies.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn on_update(&self, _stats: &UpdateStats) {}
//! }
//!
//! let evaluator = AccessEvaluator::new(config).with_metrics_sink(Arc::new(Counters::default()));
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::types::Reason;

/// Snapshot of one evaluation, passed to [`MetricsSink::on_evaluation`].
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationStats {
    /// Wall-clock time for the whole evaluation, directory calls included.
    pub duration: Duration,
    pub granted: bool,
    pub reason: Reason,
    /// The swiped identifier. The LCC is never reported.
    pub identifier: String,
}

/// Per-phase timings in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationPhases {
    /// Time spent waiting on the directory lookup.
    pub lookup_ms: f64,
    /// Time spent waiting on the credential update, zero if none was issued.
    pub update_ms: f64,
    pub total_ms: f64,
}

impl EvaluationPhases {
    /// Time spent in the evaluator's own logic.
    pub fn overhead_ms(&self) -> f64 {
        self.total_ms - (self.lookup_ms + self.update_ms)
    }
}

/// Result of one credential update attempt.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStats {
    pub account_name: String,
    pub succeeded: bool,
}

/// Consumer of evaluator metrics.
///
/// Called synchronously on the evaluation path, so implementations should
/// return quickly. They must be thread-safe because one evaluator may serve
/// many concurrent swipes.
pub trait MetricsSink: Send + Sync {
    /// Called once per evaluation, whatever the outcome.
    fn on_evaluation(&self, stats: &EvaluationStats);

    /// Called after every credential update attempt.
    fn on_update(&self, stats: &UpdateStats);

    /// Optional phase breakdown. Does nothing unless overridden.
    fn on_evaluation_phases(&self, _stats: &EvaluationStats, _phases: &EvaluationPhases) {}
}

/// Drops all metrics. This is the evaluator's default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_evaluation(&self, _stats: &EvaluationStats) {}
    fn on_update(&self, _stats: &UpdateStats) {}
}
