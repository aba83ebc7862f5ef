//! Capacity mutator — applies (minimum, desired) to one group.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FleetProvider;

/// Sets a single group's capacity and logs failures by kind.
///
/// There is no retry here: a failed group is picked up again on a later
/// cycle.
#[derive(Clone)]
pub struct CapacityMutator {
    provider: Arc<dyn FleetProvider>,
}

impl CapacityMutator {
    pub fn new(provider: Arc<dyn FleetProvider>) -> Self {
        Self { provider }
    }

    pub async fn set_capacity(&self, name: &str, minimum: u32, desired: u32) -> ProviderResult<()> {
        info!(group = %name, minimum, desired, "updating group capacity");

        let result = self.provider.update_capacity(name, minimum, desired).await;
        if let Err(e) = &result {
            match e {
                ProviderError::ScalingActivityInProgress { .. } => {
                    warn!(group = %name, code = e.code(), error = %e, "scaling activity in progress, will retry next cycle");
                }
                ProviderError::ResourceContention(_) => {
                    warn!(group = %name, code = e.code(), error = %e, "provider contention, will retry next cycle");
                }
                ProviderError::GroupNotFound(_) => {
                    warn!(group = %name, minimum, desired, code = e.code(), "group no longer exists");
                }
                _ => {
                    warn!(
                        group = %name,
                        minimum,
                        desired,
                        code = e.code(),
                        error = ?e,
                        "capacity update failed"
                    );
                }
            }
        }
        result
    }
}
