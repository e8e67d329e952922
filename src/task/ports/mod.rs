//! Port contracts for task graph persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the integrity
//! checks and the graph service.

pub mod graph;
pub mod store;

pub use graph::TaskGraph;
pub use store::{GraphTransaction, TaskGraphStore, TaskGraphStoreError, TaskGraphStoreResult};
