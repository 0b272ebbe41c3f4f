//! Adapters - Implementations of port interfaces.
//!
//! - `events` - In-memory event bus
//! - `hierarchy` - Hierarchy reader backed by registered trees
//! - `http` - Axum REST API
//! - `storage` - Judgment repositories (in-memory, YAML files)

pub mod events;
pub mod hierarchy;
pub mod http;
pub mod storage;

pub use events::InMemoryEventBus;
pub use hierarchy::InMemoryHierarchy;
pub use http::{api_router, MatrixAppState};
pub use storage::{FileJudgmentRepository, InMemoryJudgmentRepository};
