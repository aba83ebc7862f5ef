//! Cycle controller error types.

use economatic_core::ScheduleError;
use economatic_state::StateError;
use thiserror::Error;

/// Invocation-level failures. Per-group failures never surface here.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    OutOfWindow(#[from] ScheduleError),

    #[error("failed to {op} run-state: {source}")]
    RunState {
        op: &'static str,
        #[source]
        source: StateError,
    },

    #[error("failed to load snapshots: {0}")]
    SnapshotScan(#[source] StateError),
}

pub type CycleResult<T> = Result<T, CycleError>;
