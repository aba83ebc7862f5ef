//! Storage traits the cycle controller is written against.
//!
//! [`StateStore`](crate::StateStore) implements both; tests substitute
//! wrappers that fail on chosen keys.

use crate::error::StateResult;
use crate::types::{GroupSnapshot, RunState};

/// Keyed persistence for group capacity snapshots.
///
/// Each call is independent. Nothing spans more than one group.
pub trait SnapshotStore: Send + Sync {
    /// Insert or overwrite the snapshot for `snapshot.name`.
    fn put_snapshot(&self, snapshot: &GroupSnapshot) -> StateResult<()>;

    fn get_snapshot(&self, name: &str) -> StateResult<Option<GroupSnapshot>>;

    fn list_snapshots(&self) -> StateResult<Vec<GroupSnapshot>>;

    /// Delete the snapshot for `name`. Returns true if it existed.
    fn delete_snapshot(&self, name: &str) -> StateResult<bool>;
}

/// The single run-state record. It is only ever overwritten, never deleted.
pub trait RunStateStore: Send + Sync {
    /// Load the record for the current schema version, if any.
    fn get_run_state(&self) -> StateResult<Option<RunState>>;

    fn put_run_state(&self, state: &RunState) -> StateResult<()>;
}
