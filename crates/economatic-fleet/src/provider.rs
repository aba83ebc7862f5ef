//! The provider trait.

use std::future::Future;
use std::pin::Pin;

use economatic_core::Group;

use crate::error::ProviderResult;

/// Boxed future alias for provider calls.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = ProviderResult<T>> + Send + 'a>>;

/// One page of a group listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPage {
    pub groups: Vec<Group>,
    /// Token for the next page, `None` on the last page.
    pub next_token: Option<String>,
}

/// Fleet-management API. Injected so the controller can run against a cloud
/// client or a manifest file as well as a test double.
///
/// Implementations own their timeouts and transport retries. Callers never
/// retry within one invocation.
pub trait FleetProvider: Send + Sync {
    /// Fetch one page of groups, starting after `next_token`.
    fn describe_groups<'a>(&'a self, next_token: Option<&'a str>) -> ProviderFuture<'a, GroupPage>;

    /// Set the minimum size and desired capacity of the named group.
    fn update_capacity<'a>(
        &'a self,
        name: &'a str,
        minimum: u32,
        desired: u32,
    ) -> ProviderFuture<'a, ()>;
}
