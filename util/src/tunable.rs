//! Live-tunable parameter store
//!
//! A `TunableStore` is a cheap-to-clone handle onto a shared table of named
//! numeric values. Consumers read values with a default, so an empty store
//! leaves every consumer on its configured defaults. Tuning tools write into
//! the table from elsewhere and consumers pick the new values up on their
//! next read.
//!
//! Each write bumps a revision counter. A consumer holding a `ChangeToken`
//! can ask whether anything changed since it last checked, which lets it skip
//! expensive reconfiguration on cycles where nothing was tuned.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use log::{debug, warn};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Handle onto a shared table of tunable values.
#[derive(Clone, Default, Debug)]
pub struct TunableStore {
    table: Arc<RwLock<Table>>
}

#[derive(Default, Debug)]
struct Table {
    values: HashMap<String, f64>,
    revision: u64
}

/// Per-consumer record of the last store revision it has seen.
///
/// A fresh token reports a change on its first check.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChangeToken {
    seen_revision: Option<u64>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur when parsing a tuning assignment.
#[derive(Debug, Error, PartialEq)]
pub enum TunableError {
    #[error("Expected an assignment of the form `name=value`, found `{0}`")]
    MalformedAssignment(String),

    #[error("Cannot parse `{1}` as a value for `{0}`")]
    InvalidValue(String, String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TunableStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for `name`, or `default` if it has not been tuned.
    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.read().values.get(name).copied().unwrap_or(default)
    }

    /// Set the value for `name`.
    ///
    /// Non-finite values are rejected and leave the table untouched. Setting a
    /// name to the value it already holds does not count as a change.
    pub fn set(&self, name: &str, value: f64) {
        if !value.is_finite() {
            warn!("Ignoring non-finite tunable value {} for \"{}\"", value, name);
            return;
        }

        let mut table = self.write();
        if table.values.get(name) == Some(&value) {
            return;
        }

        table.values.insert(name.to_string(), value);
        table.revision += 1;

        debug!("Tunable \"{}\" set to {} (rev {})", name, value, table.revision);
    }

    /// Remove any tuned value for `name`, returning consumers to their
    /// default.
    pub fn unset(&self, name: &str) {
        let mut table = self.write();
        if table.values.remove(name).is_some() {
            table.revision += 1;
        }
    }

    /// Return whether the store has changed since the holder of `token` last
    /// checked, and mark the current revision as seen.
    pub fn has_changed(&self, token: &mut ChangeToken) -> bool {
        let revision = self.revision();
        let changed = token.seen_revision != Some(revision);
        token.seen_revision = Some(revision);

        changed
    }

    /// Current revision of the table.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    /// Parse and apply an assignment of the form `name=value`.
    pub fn apply_assignment(&self, assignment: &str) -> Result<(), TunableError> {
        let (name, value) = parse_assignment(assignment)?;
        self.set(&name, value);
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        // A panic while holding the lock cannot leave the table half-written,
        // so a poisoned lock is still safe to use.
        self.table.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse an assignment of the form `name=value`.
pub fn parse_assignment(assignment: &str) -> Result<(String, f64), TunableError> {
    let mut parts = assignment.splitn(2, '=');

    let name = parts.next().map(str::trim).unwrap_or("");
    let value = match parts.next() {
        Some(v) => v.trim(),
        None => return Err(TunableError::MalformedAssignment(assignment.to_string()))
    };

    if name.is_empty() {
        return Err(TunableError::MalformedAssignment(assignment.to_string()));
    }

    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((name.to_string(), v)),
        _ => Err(TunableError::InvalidValue(name.to_string(), value.to_string()))
    }
}
