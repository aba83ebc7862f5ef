//! economatic-fleet — the fleet-management provider seam.
//!
//! The provider is anything that can list autoscaling groups (paginated,
//! with labels) and set a group's minimum and desired capacity. On top of
//! the [`FleetProvider`] trait this crate builds:
//!
//! ```text
//! GroupInventory   list_managed_groups()  pages to the end, drops opted-out groups
//! CapacityMutator  set_capacity()         one update, errors classified and logged
//! ```
//!
//! Two providers ship with the crate: [`InMemoryFleet`] for tests, with fault
//! injection, and [`ManifestFleet`], which serves a TOML manifest from disk.

pub mod error;
pub mod inventory;
pub mod manifest;
pub mod memory;
pub mod mutator;
pub mod provider;

pub use error::{ProviderError, ProviderResult};
pub use inventory::GroupInventory;
pub use manifest::{FleetManifest, ManifestFleet};
pub use memory::InMemoryFleet;
pub use mutator::CapacityMutator;
pub use provider::{FleetProvider, GroupPage, ProviderFuture};
