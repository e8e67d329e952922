//! Graph integrity rules for the task model.
//!
//! - [`cycles`]: parent-chain and prerequisite cycle detection
//! - [`structure`]: leaf-only estimate and time entry rules
//! - [`guard`]: decides which checks a write needs and runs them
//! - [`order`]: prerequisite-respecting ordering for schedulers
//!
//! Every check reads through the [`TaskGraph`](crate::task::ports::TaskGraph)
//! port, so the same rules run inside a store transaction or over a test
//! fixture.

pub mod cycles;
mod error;
pub mod guard;
pub mod order;
pub mod structure;

pub use cycles::{CycleDetector, detect_parent_cycle, detect_prerequisite_cycle};
pub use error::{CycleError, IntegrityError};
pub use guard::MutationGuard;
pub use order::scheduling_order;
pub use structure::{validate_leaf_only_estimate, validate_time_entry_on_leaf};
