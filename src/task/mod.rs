//! Project task graph with integrity enforcement.
//!
//! Tasks form a parent/child forest and a prerequisite DAG. Every write goes
//! through [`services::TaskGraphService`], which runs the checks from
//! [`integrity`] inside a store transaction. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Graph invariants in [`integrity`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod integrity;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
