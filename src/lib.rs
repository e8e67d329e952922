//! Taskweave: integrity engine for project task graphs.
//!
//! A project is a set of tasks arranged two ways at once: a parent/child
//! hierarchy for breaking work down, and prerequisite edges saying which
//! tasks must finish first. This crate keeps both relations well-formed as
//! the graph is edited.
//!
//! # Architecture
//!
//! Taskweave follows hexagonal architecture principles:
//!
//! - **Domain**: tasks, time entries and scheduling inputs
//! - **Ports**: the graph store contract and its read view
//! - **Adapters**: an in-memory store
//! - **Services**: validated writes, audits and scheduler hooks
//!
//! # Modules
//!
//! - [`task`]: task graph model, integrity checks and services
//! - [`config`]: environment-driven settings
//! - [`telemetry`]: structured logging setup

pub mod config;
pub mod task;
pub mod telemetry;
