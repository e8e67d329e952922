//! Unit tests for the task graph module.
//!
//! Traversal and validation tests run against [`fixtures::FixtureGraph`], a
//! hand-built graph that can hold states the store would never accept.
//! Store and service tests use the in-memory adapter.
