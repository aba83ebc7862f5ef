//! Manifest-file provider.
//!
//! Serves a fleet described in a TOML file, and writes capacity updates back
//! to the same file. Lets the daemon run end to end without a cloud client.
//!
//! ```toml
//! [[groups]]
//! name = "web"
//! minimum = 2
//! desired = 4
//!
//! [[groups]]
//! name = "batch"
//! minimum = 1
//! desired = 1
//! labels = { economatic = "false" }
//! ```

use std::path::{Path, PathBuf};

use economatic_core::Group;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{FleetProvider, GroupPage, ProviderFuture};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetManifest {
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl FleetManifest {
    pub fn parse(content: &str) -> ProviderResult<Self> {
        toml::from_str(content).map_err(|e| ProviderError::Other(format!("bad manifest: {e}")))
    }

    pub fn to_toml_string(&self) -> ProviderResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ProviderError::Other(format!("manifest encode: {e}")))
    }
}

/// A [`FleetProvider`] backed by a [`FleetManifest`] on disk.
pub struct ManifestFleet {
    path: PathBuf,
    page_size: usize,
    /// Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl ManifestFleet {
    pub fn new(path: &Path, page_size: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            page_size: page_size.max(1),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> ProviderResult<FleetManifest> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ProviderError::Other(format!("read {}: {e}", self.path.display()))
        })?;
        FleetManifest::parse(&content)
    }

    async fn store(&self, manifest: &FleetManifest) -> ProviderResult<()> {
        let content = manifest.to_toml_string()?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            ProviderError::Other(format!("write {}: {e}", self.path.display()))
        })
    }

    async fn describe(&self, next_token: Option<&str>) -> ProviderResult<GroupPage> {
        let manifest = self.load().await?;
        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ProviderError::InvalidNextToken(token.to_string()))?,
            None => 0,
        };
        let total = manifest.groups.len();
        let groups: Vec<Group> = manifest
            .groups
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        let end = start + groups.len();
        let next_token = (end < total).then(|| end.to_string());
        Ok(GroupPage { groups, next_token })
    }

    async fn update(&self, name: &str, minimum: u32, desired: u32) -> ProviderResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut manifest = self.load().await?;
        let group = manifest
            .groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| ProviderError::GroupNotFound(name.to_string()))?;
        group.minimum = minimum;
        group.desired = desired;
        self.store(&manifest).await?;
        debug!(group = %name, path = ?self.path, "manifest updated");
        Ok(())
    }
}

impl FleetProvider for ManifestFleet {
    fn describe_groups<'a>(&'a self, next_token: Option<&'a str>) -> ProviderFuture<'a, GroupPage> {
        Box::pin(self.describe(next_token))
    }

    fn update_capacity<'a>(
        &'a self,
        name: &'a str,
        minimum: u32,
        desired: u32,
    ) -> ProviderFuture<'a, ()> {
        Box::pin(self.update(name, minimum, desired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::GroupInventory;
    use std::sync::Arc;

    const MANIFEST: &str = r#"
[[groups]]
name = "web"
minimum = 2
desired = 4

[[groups]]
name = "batch"
minimum = 1
desired = 1
labels = { economatic = "false" }

[[groups]]
name = "worker"
minimum = 0
desired = 3
"#;

    fn write_manifest(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("fleet.toml");
        std::fs::write(&path, MANIFEST).unwrap();
        path
    }

    #[test]
    fn parse_manifest() {
        let manifest = FleetManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.groups.len(), 3);
        assert!(manifest.groups[1].is_opted_out());
    }

    #[tokio::test]
    async fn lists_across_pages() {
        let dir = tempfile::tempdir().unwrap();
        let fleet = ManifestFleet::new(&write_manifest(&dir), 1);
        let inventory = GroupInventory::new(Arc::new(fleet));

        let names: Vec<_> = inventory
            .list_managed_groups()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["web", "worker"]);
    }

    #[tokio::test]
    async fn update_is_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir);
        let fleet = ManifestFleet::new(&path, 10);

        fleet.update_capacity("web", 0, 0).await.unwrap();

        let manifest = FleetManifest::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let web = manifest.groups.iter().find(|g| g.name == "web").unwrap();
        assert_eq!((web.minimum, web.desired), (0, 0));
        let batch = manifest.groups.iter().find(|g| g.name == "batch").unwrap();
        assert!(batch.is_opted_out());
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fleet = ManifestFleet::new(&write_manifest(&dir), 10);

        let err = fleet.update_capacity("gone", 1, 1).await.unwrap_err();
        assert_eq!(err, ProviderError::GroupNotFound("gone".to_string()));
    }

    #[tokio::test]
    async fn missing_file_is_a_provider_error() {
        let dir = tempfile::tempdir().unwrap();
        let fleet = ManifestFleet::new(&dir.path().join("absent.toml"), 10);

        assert!(matches!(
            fleet.describe_groups(None).await,
            Err(ProviderError::Other(_))
        ));
    }
}
