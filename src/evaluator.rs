use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::EvaluatorConfig;
use crate::metrics::{EvaluationPhases, EvaluationStats, MetricsSink, NoOpSink, UpdateStats};
use crate::timers::{PhaseTimer, as_millis_f64};
use crate::traits::DirectoryLookup;
use crate::types::{
    AccessDecision, CredentialVersion, DirectoryRecord, Reason, SwipeEvent, UpdateOutcome,
    UpdateRequest,
};

/// Decides whether a swipe opens the door. Cloneable and thread-safe.
///
/// The evaluator holds no per-swipe state. Each call to [`evaluate`](Self::evaluate)
/// performs one directory lookup and, only when a newer card is granted,
/// one credential update.
#[derive(Clone)]
pub struct AccessEvaluator {
    config: Arc<EvaluatorConfig>,
    sink: Arc<dyn MetricsSink>,
}

impl AccessEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        AccessEvaluator {
            config: Arc::new(config),
            sink: Arc::new(NoOpSink),
        }
    }

    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a single swipe against `directory`.
    ///
    /// Never fails: directory errors and bad data all end in a denial with
    /// the matching [`Reason`].
    pub fn evaluate<D>(&self, swipe: &SwipeEvent, directory: &D) -> AccessDecision
    where
        D: DirectoryLookup + ?Sized,
    {
        let start = Instant::now();
        let mut lookup = Duration::ZERO;
        let mut update = Duration::ZERO;

        debug!(event = "Swipe", phase = "Received", swipe = %swipe);

        let decision = self.decide(swipe, directory, &mut lookup, &mut update);
        let duration = start.elapsed();

        debug!(
            event = "Swipe",
            phase = "Decided",
            identifier = swipe.identifier,
            granted = decision.granted,
            reason = %decision.reason
        );

        let stats = EvaluationStats {
            duration,
            granted: decision.granted,
            reason: decision.reason,
            identifier: swipe.identifier.clone(),
        };
        self.sink.on_evaluation(&stats);
        self.sink.on_evaluation_phases(
            &stats,
            &EvaluationPhases {
                lookup_ms: as_millis_f64(lookup),
                update_ms: as_millis_f64(update),
                total_ms: as_millis_f64(duration),
            },
        );

        decision
    }

    fn decide<D>(
        &self,
        swipe: &SwipeEvent,
        directory: &D,
        lookup_time: &mut Duration,
        update_time: &mut Duration,
    ) -> AccessDecision
    where
        D: DirectoryLookup + ?Sized,
    {
        // 1. Lookup
        let response = {
            let _timer = PhaseTimer::new(lookup_time);
            directory.find_by_identifier(&swipe.identifier)
        };
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    event = "Swipe",
                    phase = "Lookup",
                    identifier = swipe.identifier,
                    error = %e,
                    "Directory lookup failed, denying access"
                );
                return AccessDecision::deny(Reason::DirectoryError);
            }
        };

        // 2. Exactly one match. An empty identifier can match every account.
        let Some(raw) = response.single_match() else {
            warn!(
                event = "Swipe",
                phase = "Lookup",
                identifier = swipe.identifier,
                summary = response.summary,
                records = response.records.len(),
                "Lookup did not resolve to a single account, denying access"
            );
            return AccessDecision::deny(Reason::AmbiguousOrNoMatch);
        };

        // 3. Extract
        let record = match DirectoryRecord::try_from(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    event = "Swipe",
                    phase = "Extract",
                    identifier = swipe.identifier,
                    error = %e,
                    "Directory record is malformed, denying access"
                );
                return AccessDecision::deny(Reason::RecordMalformed);
            }
        };

        debug!(
            event = "Swipe",
            phase = "Extract",
            account = record.account_name,
            stored_lcc = record.stored_credential_version,
            groups = ?record.group_memberships
        );

        // 4. Group membership
        if !self
            .config
            .allowed_groups
            .intersects(&record.group_memberships)
        {
            info!(
                event = "Swipe",
                phase = "GroupCheck",
                account = record.account_name,
                allowed = %self.config.allowed_groups,
                "Account is not in an allowed group, denying access"
            );
            return AccessDecision::deny(Reason::NotInAllowedGroup);
        }

        // 5. Versions
        let (swiped, stored) = match (
            swipe.credential_version.parse::<CredentialVersion>(),
            record.stored_credential_version.parse::<CredentialVersion>(),
        ) {
            (Ok(swiped), Ok(stored)) => (swiped, stored),
            (swiped, stored) => {
                warn!(
                    event = "Swipe",
                    phase = "VersionCompare",
                    account = record.account_name,
                    swiped_ok = swiped.is_ok(),
                    stored_ok = stored.is_ok(),
                    "LCC is not numeric, denying access"
                );
                return AccessDecision::deny(Reason::VersionParseFailure);
            }
        };

        match swiped.cmp(&stored) {
            Ordering::Less => {
                warn!(
                    event = "Swipe",
                    phase = "VersionCompare",
                    account = record.account_name,
                    stored_lcc = %stored,
                    swiped_lcc = %swiped,
                    "Card is older than the stored LCC, denying access"
                );
                AccessDecision::deny(Reason::StaleCredential)
            }
            Ordering::Equal => AccessDecision::grant(),
            Ordering::Greater => {
                let request = UpdateRequest {
                    account_name: record.account_name,
                    new_credential_version: swipe.credential_version.trim_ascii().to_string(),
                };
                let outcome = {
                    let _timer = PhaseTimer::new(update_time);
                    self.apply_update(directory, &request, stored)
                };
                AccessDecision::grant_with_update(request, outcome)
            }
        }
    }

    /// 6. Move the stored LCC forward. The grant is already decided; a failure
    /// here is reported, not retried.
    fn apply_update<D>(
        &self,
        directory: &D,
        request: &UpdateRequest,
        stored: CredentialVersion,
    ) -> UpdateOutcome
    where
        D: DirectoryLookup + ?Sized,
    {
        info!(
            event = "Swipe",
            phase = "Update",
            account = request.account_name,
            stored_lcc = %stored,
            swiped_lcc = request.new_credential_version,
            "Newer card presented, updating stored LCC"
        );

        let result = directory
            .update_credential_version(&request.account_name, &request.new_credential_version);

        self.sink.on_update(&UpdateStats {
            account_name: request.account_name.clone(),
            succeeded: result.is_ok(),
        });

        match result {
            Ok(()) => {
                info!(
                    event = "Swipe",
                    phase = "Update",
                    account = request.account_name,
                    from = %stored,
                    to = request.new_credential_version,
                    "LCC update succeeded"
                );
                UpdateOutcome::Applied
            }
            Err(e) => {
                warn!(
                    event = "Swipe",
                    phase = "Update",
                    account = request.account_name,
                    from = %stored,
                    to = request.new_credential_version,
                    error = %e,
                    "LCC update failed, access still granted"
                );
                UpdateOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
