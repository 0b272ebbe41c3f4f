//! Domain layer containing the comparison and priority logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, events, state machine)
//! - `hierarchy` - Nodes, sibling order and global weight synthesis
//! - `comparison` - Reciprocal judgment matrices, scale codec and sequencing
//! - `priority` - Priority derivation, consistency and group aggregation

pub mod comparison;
pub mod foundation;
pub mod hierarchy;
pub mod priority;
