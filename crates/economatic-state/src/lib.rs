//! economatic-state — embedded state store for Economatic.
//!
//! Backed by [redb](https://docs.rs/redb), holds the two records that let a
//! stateless invocation pick up where the previous one left off:
//!
//! - one capacity snapshot per scaled-down group, keyed by group name
//! - a single run-state record, keyed by schema version
//!
//! Values are JSON-serialized into redb's `&[u8]` value columns. The
//! `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).
//! The cycle controller depends only on the [`SnapshotStore`] and
//! [`RunStateStore`] traits.

pub mod error;
pub mod port;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use port::{RunStateStore, SnapshotStore};
pub use store::StateStore;
pub use types::*;
