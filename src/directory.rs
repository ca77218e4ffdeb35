//! An in-process [`DirectoryLookup`] backed by a map.
//!
//! Useful for tests and for hosts running without a live directory. It
//! reproduces the directory behavior the evaluator guards against: a
//! lookup with an empty identifier matches every entry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tracing::debug;

use crate::error::DirectoryError;
use crate::traits::DirectoryLookup;
use crate::types::{LookupResponse, RawRecord};

#[derive(Debug, Default)]
struct State {
    entries: Vec<(String, RawRecord)>,
    lookup_failure: Option<DirectoryError>,
    update_failure: Option<DirectoryError>,
}

/// Thread-safe, cloneable in-memory directory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<State>>,
    lookups: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under `identifier`. Several entries may share one identifier.
    pub fn with_entry(self, identifier: impl Into<String>, record: RawRecord) -> Self {
        self.insert(identifier, record);
        self
    }

    pub fn insert(&self, identifier: impl Into<String>, record: RawRecord) {
        self.write_state()
            .entries
            .push((identifier.into(), record));
    }

    /// Make every subsequent lookup fail with `error` (or succeed again with `None`).
    pub fn set_lookup_failure(&self, error: Option<DirectoryError>) {
        self.write_state().lookup_failure = error;
    }

    /// Make every subsequent update fail with `error` (or succeed again with `None`).
    pub fn set_update_failure(&self, error: Option<DirectoryError>) {
        self.write_state().update_failure = error;
    }

    /// Setup writes go through even if a panicking thread poisoned the lock.
    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The stored credential version of `account_name`, if the account exists.
    pub fn credential_version(&self, account_name: &str) -> Option<String> {
        let state = self.state.read().ok()?;
        state
            .entries
            .iter()
            .find(|(_, r)| r.account_name.first().map(String::as_str) == Some(account_name))
            .and_then(|(_, r)| r.credential_version.first().cloned())
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl DirectoryLookup for InMemoryDirectory {
    fn find_by_identifier(&self, identifier: &str) -> Result<LookupResponse, DirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let state = self
            .state
            .read()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        if let Some(err) = &state.lookup_failure {
            return Err(err.clone());
        }

        let records: Vec<RawRecord> = state
            .entries
            .iter()
            .filter(|(id, _)| identifier.is_empty() || id == identifier)
            .map(|(_, record)| record.clone())
            .collect();
        debug!(
            event = "Directory",
            phase = "Lookup",
            identifier = identifier,
            matched = records.len()
        );
        Ok(LookupResponse::from_records(records))
    }

    fn update_credential_version(
        &self,
        account_name: &str,
        new_version: &str,
    ) -> Result<(), DirectoryError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut state = self
            .state
            .write()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        if let Some(err) = &state.update_failure {
            return Err(err.clone());
        }

        let mut touched = 0;
        for (_, record) in state.entries.iter_mut() {
            if record.account_name.first().map(String::as_str) == Some(account_name) {
                record.credential_version = vec![new_version.to_string()];
                touched += 1;
            }
        }
        if touched == 0 {
            return Err(DirectoryError::Update {
                account: account_name.to_string(),
                message: "no such account".to_string(),
            });
        }
        Ok(())
    }
}
