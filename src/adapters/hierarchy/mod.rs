//! Hierarchy reader adapters.

mod in_memory;

pub use in_memory::InMemoryHierarchy;
