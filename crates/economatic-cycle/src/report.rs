//! What one invocation did.

use economatic_core::Phase;
use economatic_fleet::ProviderError;
use economatic_state::GroupSnapshot;

/// Result of processing one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// UP: capacity restored from the snapshot.
    Restored {
        snapshot: GroupSnapshot,
        snapshot_deleted: bool,
    },
    /// UP: the restore failed. The snapshot is still deleted.
    RestoreFailed {
        snapshot: GroupSnapshot,
        error: ProviderError,
        snapshot_deleted: bool,
    },
    /// DOWN: snapshot written and the group set to zero.
    Zeroed { snapshot: GroupSnapshot },
    /// DOWN: the snapshot could not be written, so the group was left alone.
    SnapshotFailed { group: String, error: String },
    /// DOWN: snapshot written but the zeroing call failed.
    ZeroFailed {
        snapshot: GroupSnapshot,
        error: ProviderError,
    },
}

impl GroupOutcome {
    pub fn group(&self) -> &str {
        match self {
            GroupOutcome::Restored { snapshot, .. }
            | GroupOutcome::RestoreFailed { snapshot, .. }
            | GroupOutcome::Zeroed { snapshot }
            | GroupOutcome::ZeroFailed { snapshot, .. } => &snapshot.name,
            GroupOutcome::SnapshotFailed { group, .. } => group,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            GroupOutcome::Restored {
                snapshot_deleted: true,
                ..
            } | GroupOutcome::Zeroed { .. }
        )
    }
}

/// Summary of a completed invocation. Run-state has already been persisted
/// as `next_phase` by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub phase: Phase,
    pub next_phase: Phase,
    pub outcomes: Vec<GroupOutcome>,
    /// Set when the DOWN inventory could not be listed at all.
    pub inventory_error: Option<ProviderError>,
}

impl CycleReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outcome(&self, group: &str) -> Option<&GroupOutcome> {
        self.outcomes.iter().find(|o| o.group() == group)
    }
}
