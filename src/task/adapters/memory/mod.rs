//! In-memory adapters for tests and embedded use.

mod graph_store;

pub use graph_store::InMemoryTaskGraphStore;
