//! Ports - Interfaces for external collaborators.
//!
//! The engine itself stays pure. Application handlers receive these narrow
//! traits and call them before and after the computations, never during.
//!
//! - `JudgmentRepository` - Judgment records and computed results per matrix
//! - `HierarchyReader` - Ordered children of a parent node
//! - `EventPublisher` - Outbound domain events

mod event_publisher;
mod hierarchy_reader;
mod judgment_repository;

pub use event_publisher::EventPublisher;
pub use hierarchy_reader::HierarchyReader;
pub use judgment_repository::JudgmentRepository;
