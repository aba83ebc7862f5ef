//! redb table definitions for the Economatic state store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized records).

use redb::TableDefinition;

/// Group capacity snapshots keyed by group name.
pub const SNAPSHOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("economatic");

/// The run-state record keyed by schema version.
pub const RUN_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("economatic_metadata");
