//! Persisted records.

use std::fmt;

use economatic_core::{Group, Phase};
use serde::{Deserialize, Serialize};

/// Key of the single run-state record. Bump when the record layout changes
/// so that an older record is treated as absent rather than misread.
pub const SCHEMA_VERSION: &str = "20190219";

/// A group's capacity as observed just before it was scaled to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub minimum: u32,
    pub desired: u32,
}

impl GroupSnapshot {
    pub fn new(name: &str, minimum: u32, desired: u32) -> Self {
        Self {
            name: name.to_string(),
            minimum,
            desired,
        }
    }

    pub fn table_key(&self) -> &str {
        &self.name
    }
}

impl From<&Group> for GroupSnapshot {
    fn from(group: &Group) -> Self {
        Self::new(&group.name, group.minimum, group.desired)
    }
}

impl fmt::Display for GroupSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, minimum: {}, desired: {}",
            self.name, self.minimum, self.desired
        )
    }
}

/// Which phase the next invocation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: Phase,
    pub version: String,
}

impl RunState {
    /// A record for `phase` tagged with the current schema version.
    pub fn current(phase: Phase) -> Self {
        Self {
            phase,
            version: SCHEMA_VERSION.to_string(),
        }
    }
}
