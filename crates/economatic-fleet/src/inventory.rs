//! Group inventory — every managed group the cycle may scale.

use std::collections::HashSet;
use std::sync::Arc;

use economatic_core::Group;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FleetProvider;

/// Lists groups through a [`FleetProvider`], following pagination to the
/// last page and dropping groups labelled `economatic=false`.
#[derive(Clone)]
pub struct GroupInventory {
    provider: Arc<dyn FleetProvider>,
}

impl GroupInventory {
    pub fn new(provider: Arc<dyn FleetProvider>) -> Self {
        Self { provider }
    }

    /// All groups eligible for scaling, in provider order.
    pub async fn list_managed_groups(&self) -> ProviderResult<Vec<Group>> {
        let mut groups = Vec::new();
        let mut next_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = match self.provider.describe_groups(next_token.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(code = e.code(), error = %e, pages, "failed to describe groups");
                    return Err(e);
                }
            };
            pages += 1;

            for group in page.groups {
                if group.is_opted_out() {
                    info!(group = %group.name, "excluding via labels");
                    continue;
                }
                groups.push(group);
            }

            match page.next_token {
                Some(token) => {
                    // A token seen before means the provider is cycling.
                    if !seen_tokens.insert(token.clone()) {
                        warn!(%token, pages, "pagination token repeated");
                        return Err(ProviderError::InvalidNextToken(token));
                    }
                    next_token = Some(token);
                }
                None => break,
            }
        }

        debug!(pages, groups = groups.len(), "inventory listed");
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryFleet;
    use crate::provider::{GroupPage, ProviderFuture};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out tokens `a -> b -> a`, never reaching a last page.
    #[derive(Default)]
    struct CyclingTokens {
        calls: AtomicUsize,
    }

    impl FleetProvider for CyclingTokens {
        fn describe_groups<'a>(
            &'a self,
            next_token: Option<&'a str>,
        ) -> ProviderFuture<'a, GroupPage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let next = match next_token {
                Some("a") => "b",
                _ => "a",
            };
            Box::pin(async move {
                Ok(GroupPage {
                    groups: vec![Group::new(&format!("group-{call}"), 1, 1)],
                    next_token: Some(next.to_string()),
                })
            })
        }

        fn update_capacity<'a>(
            &'a self,
            name: &'a str,
            _minimum: u32,
            _desired: u32,
        ) -> ProviderFuture<'a, ()> {
            Box::pin(async move { Err(ProviderError::GroupNotFound(name.to_string())) })
        }
    }

    #[tokio::test]
    async fn reads_every_page() {
        let fleet = InMemoryFleet::new(
            (0..7).map(|i| Group::new(&format!("group-{i}"), 1, 2)),
        )
        .with_page_size(3);
        let inventory = GroupInventory::new(Arc::new(fleet.clone()));

        let groups = inventory.list_managed_groups().await.unwrap();

        assert_eq!(groups.len(), 7);
        assert_eq!(fleet.describe_calls(), 3);
    }

    #[tokio::test]
    async fn drops_opted_out_groups() {
        let fleet = InMemoryFleet::new([
            Group::new("web", 2, 4),
            Group::new("batch", 1, 1).with_label("Economatic", "FALSE"),
            Group::new("api", 3, 3).with_label("economatic", "true"),
        ]);
        let inventory = GroupInventory::new(Arc::new(fleet));

        let names: Vec<_> = inventory
            .list_managed_groups()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();

        assert_eq!(names, vec!["api", "web"]);
    }

    #[tokio::test]
    async fn exclusion_applies_on_later_pages() {
        let fleet = InMemoryFleet::new([
            Group::new("a", 1, 1),
            Group::new("b", 1, 1),
            Group::new("c", 1, 1).with_label("economatic", "false"),
        ])
        .with_page_size(2);
        let inventory = GroupInventory::new(Arc::new(fleet));

        let groups = inventory.list_managed_groups().await.unwrap();
        assert!(groups.iter().all(|g| g.name != "c"));
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test]
    async fn cycling_tokens_are_rejected() {
        let provider = Arc::new(CyclingTokens::default());
        let inventory = GroupInventory::new(provider.clone());

        let err = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            inventory.list_managed_groups(),
        )
        .await
        .expect("listing must terminate")
        .unwrap_err();

        assert_eq!(err, ProviderError::InvalidNextToken("a".to_string()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_fleet_lists_nothing() {
        let inventory = GroupInventory::new(Arc::new(InMemoryFleet::default()));
        assert!(inventory.list_managed_groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_failure_is_returned() {
        let fleet = InMemoryFleet::new([Group::new("web", 2, 4)]);
        fleet.fail_describe(ProviderError::ResourceContention("throttled".to_string()));
        let inventory = GroupInventory::new(Arc::new(fleet));

        let err = inventory.list_managed_groups().await.unwrap_err();
        assert!(err.is_transient());
    }
}
