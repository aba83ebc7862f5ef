//! Cycle controller — drives the UP/DOWN run-state machine.
//!
//! Reads the run-state record, checks the phase's daily window, runs the
//! phase against every group, and persists the flipped phase. The
//! controller holds no state between invocations.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use tracing::{debug, error, info, warn};

use economatic_core::{Group, Phase, ScheduleWindows};
use economatic_fleet::{CapacityMutator, FleetProvider, GroupInventory};
use economatic_state::{
    GroupSnapshot, RunState, RunStateStore, SnapshotStore, StateResult, StateStore,
};

use crate::error::{CycleError, CycleResult};
use crate::report::{CycleReport, GroupOutcome};

/// Runs one invocation of the cycle.
pub struct CycleController {
    run_state: Arc<dyn RunStateStore>,
    snapshots: Arc<dyn SnapshotStore>,
    inventory: GroupInventory,
    mutator: CapacityMutator,
}

impl CycleController {
    /// Create a controller over separate snapshot and run-state stores.
    pub fn new(
        provider: Arc<dyn FleetProvider>,
        snapshots: Arc<dyn SnapshotStore>,
        run_state: Arc<dyn RunStateStore>,
    ) -> Self {
        Self {
            run_state,
            snapshots,
            inventory: GroupInventory::new(Arc::clone(&provider)),
            mutator: CapacityMutator::new(provider),
        }
    }

    /// Create a controller with both records kept in one [`StateStore`].
    pub fn with_store(provider: Arc<dyn FleetProvider>, store: StateStore) -> Self {
        let store = Arc::new(store);
        Self::new(provider, store.clone(), store)
    }

    /// The phase the next invocation will run. A missing record means UP.
    pub fn current_phase(&self) -> CycleResult<Phase> {
        let state = self
            .run_state
            .get_run_state()
            .map_err(|source| CycleError::RunState { op: "load", source })?;
        Ok(state.map(|s| s.phase).unwrap_or_default())
    }

    /// Run one scheduled invocation at `now`.
    ///
    /// Fails with [`CycleError::OutOfWindow`] before touching any group if
    /// `now` is earlier in the day than the window for the pending phase.
    pub async fn run_cycle<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        windows: &ScheduleWindows,
    ) -> CycleResult<CycleReport> {
        let phase = self.current_phase()?;
        if let Err(e) = windows.check(phase, now) {
            info!(%phase, error = %e, "not yet time to run");
            return Err(e.into());
        }
        self.execute(phase).await
    }

    /// Run `phase` immediately, ignoring the stored phase and the schedule
    /// window. Run-state is still flipped afterwards.
    pub async fn run_forced(&self, phase: Phase) -> CycleResult<CycleReport> {
        warn!(%phase, "running forced phase");
        self.execute(phase).await
    }

    async fn execute(&self, phase: Phase) -> CycleResult<CycleReport> {
        info!(%phase, "cycle starting");

        let mut inventory_error = None;
        let outcomes = match phase {
            Phase::Up => self.scale_up().await?,
            Phase::Down => match self.inventory.list_managed_groups().await {
                Ok(groups) => self.scale_down(groups).await,
                Err(e) => {
                    error!(error = %e, "could not list groups, nothing scaled down");
                    inventory_error = Some(e);
                    Vec::new()
                }
            },
        };

        let next = RunState::current(phase.flip());
        self.run_state
            .put_run_state(&next)
            .map_err(|source| CycleError::RunState { op: "store", source })?;

        let report = CycleReport {
            phase,
            next_phase: next.phase,
            outcomes,
            inventory_error,
        };
        info!(
            %phase,
            next = %report.next_phase,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "cycle complete"
        );
        Ok(report)
    }

    /// Restore every stored snapshot, then delete it whatever the outcome.
    async fn scale_up(&self) -> CycleResult<Vec<GroupOutcome>> {
        let snapshots = self.snapshots.list_snapshots().map_err(|e| {
            error!(error = %e, "could not load snapshots");
            CycleError::SnapshotScan(e)
        })?;
        debug!(count = snapshots.len(), "restoring snapshots");

        let mut outcomes = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let restored = self
                .mutator
                .set_capacity(&snapshot.name, snapshot.minimum, snapshot.desired)
                .await;
            if let Err(e) = &restored {
                debug!(
                    group = %snapshot.name,
                    minimum = snapshot.minimum,
                    desired = snapshot.desired,
                    error = %e,
                    "failed to restore group"
                );
            }

            // Deleted even after a failed restore, so DOWN always starts clean.
            let snapshot_deleted = match self.snapshots.delete_snapshot(&snapshot.name) {
                Ok(_) => true,
                Err(e) => {
                    warn!(group = %snapshot.name, error = %e, "unable to remove snapshot");
                    false
                }
            };

            outcomes.push(match restored {
                Ok(()) => GroupOutcome::Restored {
                    snapshot,
                    snapshot_deleted,
                },
                Err(error) => GroupOutcome::RestoreFailed {
                    snapshot,
                    error,
                    snapshot_deleted,
                },
            });
        }
        Ok(outcomes)
    }

    /// Snapshot each group, and zero it only once its snapshot is stored.
    async fn scale_down(&self, groups: Vec<Group>) -> Vec<GroupOutcome> {
        debug!(count = groups.len(), "scaling down groups");

        let mut outcomes = Vec::with_capacity(groups.len());
        for group in groups {
            let snapshot = match self.save_snapshot(&group) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(group = %group.name, error = %e, "could not store snapshot, leaving group alone");
                    outcomes.push(GroupOutcome::SnapshotFailed {
                        group: group.name,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            match self.mutator.set_capacity(&group.name, 0, 0).await {
                Ok(()) => outcomes.push(GroupOutcome::Zeroed { snapshot }),
                Err(error) => {
                    debug!(
                        group = %group.name,
                        minimum = group.minimum,
                        desired = group.desired,
                        error = %error,
                        "could not scale down group"
                    );
                    outcomes.push(GroupOutcome::ZeroFailed { snapshot, error });
                }
            }
        }
        outcomes
    }

    /// Store the group's capacity, unless it already sits at zero with a
    /// snapshot on file: that is a repeat DOWN, and the stored snapshot is
    /// the capacity worth restoring.
    fn save_snapshot(&self, group: &Group) -> StateResult<GroupSnapshot> {
        if group.minimum == 0
            && group.desired == 0
            && let Some(existing) = self.snapshots.get_snapshot(&group.name)?
        {
            debug!(group = %group.name, snapshot = %existing, "keeping existing snapshot");
            return Ok(existing);
        }

        let snapshot = GroupSnapshot::from(group);
        info!(
            group = %snapshot.name,
            minimum = snapshot.minimum,
            desired = snapshot.desired,
            "storing snapshot"
        );
        self.snapshots.put_snapshot(&snapshot)?;
        Ok(snapshot)
    }
}
