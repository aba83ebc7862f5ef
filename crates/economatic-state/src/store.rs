//! StateStore — the redb database holding group snapshots and run-state.
//!
//! Snapshots live in the `economatic` table keyed by group name, run-state in
//! `economatic_metadata` keyed by schema version. Records are stored as JSON.
//! Every call commits its own transaction.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::port::{RunStateStore, SnapshotStore};
use crate::tables::*;
use crate::types::*;

/// Every Economatic table has string keys and JSON byte values.
type Table = TableDefinition<'static, &'static str, &'static [u8]>;

/// `map_err!(Write)` turns a redb error into `StateError::Write(msg)`.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Snapshot and run-state storage. Clones share one database handle.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open the database file at `path`, creating it and its tables on first use.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self::with_tables(db)?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// A store that lives only as long as the process. Used by tests.
    pub fn open_in_memory() -> StateResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(map_err!(Open))?;
        Self::with_tables(db)
    }

    fn with_tables(db: Database) -> StateResult<Self> {
        let txn = db.begin_write().map_err(map_err!(Transaction))?;
        for table in [SNAPSHOTS, RUN_STATE] {
            txn.open_table(table).map_err(map_err!(Table))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(Self { db: Arc::new(db) })
    }

    fn put_value(&self, table: Table, key: &str, value: &[u8]) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(table).map_err(map_err!(Table))?;
            table.insert(key, value).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn get_value<T: DeserializeOwned>(&self, table: Table, key: &str) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let value: T =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

// ── Snapshots ──────────────────────────────────────────────────────

impl SnapshotStore for StateStore {
    fn put_snapshot(&self, snapshot: &GroupSnapshot) -> StateResult<()> {
        let key = snapshot.table_key();
        let value = serde_json::to_vec(snapshot).map_err(map_err!(Serialize))?;
        self.put_value(SNAPSHOTS, key, &value)?;
        debug!(%key, "snapshot stored");
        Ok(())
    }

    fn get_snapshot(&self, name: &str) -> StateResult<Option<GroupSnapshot>> {
        self.get_value(SNAPSHOTS, name)
    }

    fn list_snapshots(&self) -> StateResult<Vec<GroupSnapshot>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let snapshot: GroupSnapshot =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(snapshot);
        }
        Ok(results)
    }

    fn delete_snapshot(&self, name: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
            existed = table.remove(name).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(key = %name, existed, "snapshot deleted");
        Ok(existed)
    }
}

// ── Run-state ──────────────────────────────────────────────────────

impl RunStateStore for StateStore {
    fn get_run_state(&self) -> StateResult<Option<RunState>> {
        self.get_value(RUN_STATE, SCHEMA_VERSION)
    }

    fn put_run_state(&self, state: &RunState) -> StateResult<()> {
        let value = serde_json::to_vec(state).map_err(map_err!(Serialize))?;
        self.put_value(RUN_STATE, &state.version, &value)?;
        debug!(phase = %state.phase, version = %state.version, "run-state stored");
        Ok(())
    }
}
