use std::cell::{Cell, RefCell};

use super::*;
use crate::error::DirectoryError;
use crate::types::{AllowedGroups, LookupResponse, RawRecord};
use crate::InMemoryDirectory;


/// A directory that answers every lookup with the same canned response and
/// records the updates it is asked to make.
struct ScriptedDirectory {
    lookup: Result<LookupResponse, DirectoryError>,
    update: Result<(), DirectoryError>,
    lookups: Cell<usize>,
    updates: RefCell<Vec<(String, String)>>,
}

impl ScriptedDirectory {
    fn returning(response: LookupResponse) -> Self {
        ScriptedDirectory {
            lookup: Ok(response),
            update: Ok(()),
            lookups: Cell::new(0),
            updates: RefCell::new(Vec::new()),
        }
    }

    fn single(record: RawRecord) -> Self {
        Self::returning(LookupResponse::new("1 user matched", vec![record]))
    }

    fn failing_lookup(error: DirectoryError) -> Self {
        ScriptedDirectory {
            lookup: Err(error),
            ..Self::returning(LookupResponse::default())
        }
    }

    fn with_failing_update(mut self, error: DirectoryError) -> Self {
        self.update = Err(error);
        self
    }

    fn updates(&self) -> Vec<(String, String)> {
        self.updates.borrow().clone()
    }
}

impl DirectoryLookup for ScriptedDirectory {
    fn find_by_identifier(&self, _identifier: &str) -> Result<LookupResponse, DirectoryError> {
        self.lookups.set(self.lookups.get() + 1);
        self.lookup.clone()
    }

    fn update_credential_version(
        &self,
        account_name: &str,
        new_version: &str,
    ) -> Result<(), DirectoryError> {
        self.updates
            .borrow_mut()
            .push((account_name.to_string(), new_version.to_string()));
        self.update.clone()
    }
}

fn jdoe(stored_lcc: &str, groups: &[&str]) -> RawRecord {
    RawRecord::new("jdoe", stored_lcc, groups.iter().copied())
}

fn users_only() -> AccessEvaluator {
    AccessEvaluator::new(EvaluatorConfig::default())
}

fn evaluator_for(groups: &[&str]) -> AccessEvaluator {
    AccessEvaluator::new(EvaluatorConfig::new(
        AllowedGroups::new(groups.iter().copied()).unwrap(),
    ))
}

#[test]
fn test_lookup_is_called_once_with_equal_versions() {
    let directory = ScriptedDirectory::single(jdoe("3", &["users"]));
    let decision = users_only().evaluate(&SwipeEvent::new("X", "3"), &directory);

    assert_eq!(decision, AccessDecision::grant());
    assert_eq!(directory.lookups.get(), 1);
    assert!(directory.updates().is_empty());
}

#[test]
fn test_directory_unavailable_denies() {
    let directory =
        ScriptedDirectory::failing_lookup(DirectoryError::Unavailable("connection refused".into()));
    let decision = users_only().evaluate(&SwipeEvent::new("X", "3"), &directory);

    assert!(!decision.granted);
    assert_eq!(decision.reason, Reason::DirectoryError);
    assert!(directory.updates().is_empty());
}

#[test]
fn test_summary_and_records_must_agree() {
    let directory =
        ScriptedDirectory::returning(LookupResponse::new("1 user matched", vec![
            jdoe("3", &["users"]),
            jdoe("3", &["users"]),
        ]));
    let decision = users_only().evaluate(&SwipeEvent::new("X", "3"), &directory);
    assert_eq!(decision.reason, Reason::AmbiguousOrNoMatch);

    let directory = ScriptedDirectory::returning(LookupResponse::new(
        "2 users matched",
        vec![jdoe("3", &["users"])],
    ));
    let decision = users_only().evaluate(&SwipeEvent::new("X", "3"), &directory);
    assert_eq!(decision.reason, Reason::AmbiguousOrNoMatch);
}

#[test]
fn test_unrecognized_summary_denies() {
    let directory =
        ScriptedDirectory::returning(LookupResponse::new("", vec![jdoe("3", &["users"])]));
    let decision = users_only().evaluate(&SwipeEvent::new("X", "3"), &directory);
    assert_eq!(decision.reason, Reason::AmbiguousOrNoMatch);
}

#[test]
fn test_malformed_records_deny() {
    let mut missing_uid = jdoe("3", &["users"]);
    missing_uid.account_name.clear();
    let mut missing_lcc = jdoe("3", &["users"]);
    missing_lcc.credential_version.clear();
    let mut missing_groups = jdoe("3", &["users"]);
    missing_groups.groups = None;

    for raw in [missing_uid, missing_lcc, missing_groups] {
        let directory = ScriptedDirectory::single(raw);
        let decision = users_only().evaluate(&SwipeEvent::new("X", "3"), &directory);
        assert!(!decision.granted);
        assert_eq!(decision.reason, Reason::RecordMalformed);
        assert!(directory.updates().is_empty());
    }
}

#[test]
fn test_group_denial_wins_over_bad_version() {
    let directory = ScriptedDirectory::single(jdoe("3", &["guests"]));
    let decision = users_only().evaluate(&SwipeEvent::new("X", "abc"), &directory);
    assert_eq!(decision.reason, Reason::NotInAllowedGroup);
}

#[test]
fn test_configured_allow_list() {
    let evaluator = evaluator_for(&["staff", "faculty"]);

    let staff = ScriptedDirectory::single(jdoe("3", &["ipausers", "faculty"]));
    assert!(evaluator.evaluate(&SwipeEvent::new("X", "3"), &staff).granted);

    let plain_user = ScriptedDirectory::single(jdoe("3", &["users"]));
    let decision = evaluator.evaluate(&SwipeEvent::new("X", "3"), &plain_user);
    assert_eq!(decision.reason, Reason::NotInAllowedGroup);
}

#[test]
fn test_empty_identifier_against_real_directory_denies() {
    let directory = InMemoryDirectory::new()
        .with_entry("100", jdoe("3", &["users"]))
        .with_entry("200", RawRecord::new("asmith", "1", ["users"]));

    let decision = users_only().evaluate(&SwipeEvent::new("", ""), &directory);

    assert_eq!(decision.reason, Reason::AmbiguousOrNoMatch);
    assert_eq!(directory.update_count(), 0);
}

#[test]
fn test_newer_card_updates_in_memory_directory() {
    let directory = InMemoryDirectory::new().with_entry("100", jdoe("3", &["users"]));
    let evaluator = users_only();

    let decision = evaluator.evaluate(&SwipeEvent::new("100", "4"), &directory);
    assert!(decision.granted);
    assert_eq!(directory.credential_version("jdoe").as_deref(), Some("4"));

    // The old card is now stale.
    let decision = evaluator.evaluate(&SwipeEvent::new("100", "3"), &directory);
    assert_eq!(decision.reason, Reason::StaleCredential);

    // The new card no longer triggers an update.
    let decision = evaluator.evaluate(&SwipeEvent::new("100", "4"), &directory);
    assert_eq!(decision, AccessDecision::grant());
    assert_eq!(directory.update_count(), 1);
}

#[test]
fn test_evaluate_through_trait_object() {
    let directory = InMemoryDirectory::new().with_entry("100", jdoe("3", &["users"]));
    let dynamic: &dyn DirectoryLookup = &directory;
    let decision = users_only().evaluate(&SwipeEvent::new("100", "3"), dynamic);
    assert!(decision.granted);
}

#[test]
fn test_evaluator_is_shareable_across_threads() {
    let directory = InMemoryDirectory::new()
        .with_entry("100", jdoe("3", &["users"]))
        .with_entry("200", RawRecord::new("asmith", "7", ["guests"]));
    let evaluator = users_only();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let evaluator = evaluator.clone();
            let directory = directory.clone();
            std::thread::spawn(move || {
                let id = if i % 2 == 0 { "100" } else { "200" };
                evaluator.evaluate(&SwipeEvent::new(id, "3"), &directory)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let decision = handle.join().unwrap();
        if i % 2 == 0 {
            assert!(decision.granted);
        } else {
            assert_eq!(decision.reason, Reason::NotInAllowedGroup);
        }
    }
    assert_eq!(directory.lookup_count(), 8);
    assert_eq!(directory.update_count(), 0);
}
