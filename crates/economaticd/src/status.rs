//! The `status` command.

use std::path::Path;

use economatic_state::{RunStateStore, SnapshotStore, StateStore};

/// Render the stored run-state and pending snapshots as pretty JSON.
///
/// Snapshots left over after an UP phase point at groups whose restore
/// needs a look by hand.
pub fn render(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("no state database at {}", path.display());
    }
    let store = StateStore::open(path)?;
    let run_state = store.get_run_state()?;
    let snapshots = store.list_snapshots()?;
    let next_phase = run_state.as_ref().map(|s| s.phase).unwrap_or_default();

    let status = serde_json::json!({
        "run_state": run_state,
        "next_phase": next_phase,
        "snapshots": snapshots,
    });
    Ok(serde_json::to_string_pretty(&status)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use economatic_core::Phase;
    use economatic_state::{GroupSnapshot, RunState};

    #[test]
    fn renders_state_and_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("economatic.redb");
        {
            let store = StateStore::open(&path).unwrap();
            store.put_run_state(&RunState::current(Phase::Up)).unwrap();
            store.put_snapshot(&GroupSnapshot::new("web", 2, 4)).unwrap();
        }

        let rendered: serde_json::Value = serde_json::from_str(&render(&path).unwrap()).unwrap();

        assert_eq!(rendered["next_phase"], "UP");
        assert_eq!(rendered["run_state"]["version"], "20190219");
        assert_eq!(rendered["snapshots"][0]["name"], "web");
        assert_eq!(rendered["snapshots"][0]["desired"], 4);
    }

    #[test]
    fn fresh_state_reports_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("economatic.redb");
        StateStore::open(&path).unwrap();

        let rendered: serde_json::Value = serde_json::from_str(&render(&path).unwrap()).unwrap();
        assert!(rendered["run_state"].is_null());
        assert_eq!(rendered["next_phase"], "UP");
    }

    #[test]
    fn missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render(&dir.path().join("absent.redb")).is_err());
    }
}
