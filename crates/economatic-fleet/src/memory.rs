//! In-memory provider for tests and dry runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use economatic_core::Group;

use crate::error::ProviderError;
use crate::provider::{FleetProvider, GroupPage, ProviderFuture};

const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Default)]
struct Inner {
    groups: BTreeMap<String, Group>,
    page_size: usize,
    describe_calls: usize,
    /// Every update attempted, including ones that failed.
    updates: Vec<(String, u32, u32)>,
    describe_failure: Option<ProviderError>,
    update_failures: HashMap<String, ProviderError>,
}

/// A fleet held in memory, listed in name order.
///
/// Clones share the same fleet, so a test can keep a handle to inspect
/// what the controller did. Failures can be injected per call kind.
#[derive(Clone)]
pub struct InMemoryFleet {
    inner: Arc<Mutex<Inner>>,
}

impl Default for InMemoryFleet {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl InMemoryFleet {
    pub fn new(groups: impl IntoIterator<Item = Group>) -> Self {
        let inner = Inner {
            groups: groups.into_iter().map(|g| (g.name.clone(), g)).collect(),
            page_size: DEFAULT_PAGE_SIZE,
            ..Default::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Limit how many groups each `describe_groups` page holds.
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.lock().page_size = page_size.max(1);
        self
    }

    /// Add or replace a group, as if it were launched mid-cycle.
    pub fn insert(&self, group: Group) {
        self.lock().groups.insert(group.name.clone(), group);
    }

    pub fn group(&self, name: &str) -> Option<Group> {
        self.lock().groups.get(name).cloned()
    }

    /// Every `(name, minimum, desired)` update attempted, in call order.
    pub fn updates(&self) -> Vec<(String, u32, u32)> {
        self.lock().updates.clone()
    }

    pub fn describe_calls(&self) -> usize {
        self.lock().describe_calls
    }

    /// Make every `describe_groups` call fail with `error`.
    pub fn fail_describe(&self, error: ProviderError) {
        self.lock().describe_failure = Some(error);
    }

    /// Make every update of `name` fail with `error`.
    pub fn fail_update(&self, name: &str, error: ProviderError) {
        self.lock().update_failures.insert(name.to_string(), error);
    }

    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.describe_failure = None;
        inner.update_failures.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The fleet stays consistent even if a holder panicked mid-test.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn describe(&self, next_token: Option<&str>) -> Result<GroupPage, ProviderError> {
        let mut inner = self.lock();
        inner.describe_calls += 1;
        if let Some(e) = &inner.describe_failure {
            return Err(e.clone());
        }

        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ProviderError::InvalidNextToken(token.to_string()))?,
            None => 0,
        };
        let groups: Vec<Group> = inner
            .groups
            .values()
            .skip(start)
            .take(inner.page_size)
            .cloned()
            .collect();
        let end = start + groups.len();
        let next_token = (end < inner.groups.len()).then(|| end.to_string());
        Ok(GroupPage { groups, next_token })
    }

    fn update(&self, name: &str, minimum: u32, desired: u32) -> Result<(), ProviderError> {
        let mut inner = self.lock();
        inner.updates.push((name.to_string(), minimum, desired));
        if let Some(e) = inner.update_failures.get(name) {
            return Err(e.clone());
        }
        let group = inner
            .groups
            .get_mut(name)
            .ok_or_else(|| ProviderError::GroupNotFound(name.to_string()))?;
        group.minimum = minimum;
        group.desired = desired;
        Ok(())
    }
}

impl FleetProvider for InMemoryFleet {
    fn describe_groups<'a>(&'a self, next_token: Option<&'a str>) -> ProviderFuture<'a, GroupPage> {
        Box::pin(async move { self.describe(next_token) })
    }

    fn update_capacity<'a>(
        &'a self,
        name: &'a str,
        minimum: u32,
        desired: u32,
    ) -> ProviderFuture<'a, ()> {
        Box::pin(async move { self.update(name, minimum, desired) })
    }
}
