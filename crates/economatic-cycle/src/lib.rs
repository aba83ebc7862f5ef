//! economatic-cycle — one invocation of the scale-down / restore cycle.
//!
//! Every invocation is independent: what to do next is read from the
//! run-state record, not from memory. The cycle alternates:
//!
//! ```text
//! run-state absent ──► UP ──► DOWN ──► UP ──► ...
//!
//! UP    for each stored snapshot:
//!           restore (minimum, desired), delete snapshot (always)
//! DOWN  for each managed group (labels economatic=false excluded):
//!           write snapshot, then and only then set (0, 0)
//! ```
//!
//! Group failures are logged and recorded in the [`CycleReport`], never
//! fatal. Run-state is flipped once at the end of every invocation that
//! reaches it, so a stuck group is retried a full cycle later instead of
//! stalling the fleet.

pub mod controller;
pub mod error;
pub mod report;

pub use controller::CycleController;
pub use error::{CycleError, CycleResult};
pub use report::{CycleReport, GroupOutcome};
