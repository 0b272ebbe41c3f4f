//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus that records what was published

mod in_memory;

pub use in_memory::InMemoryEventBus;
