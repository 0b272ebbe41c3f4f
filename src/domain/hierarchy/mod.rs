//! Hierarchy module - Nodes, sibling groups and global weight synthesis.
//!
//! Each parent with children owns one comparison matrix per evaluator; its
//! `SiblingSet` fixes the row order of that matrix.

mod errors;
mod node;
mod synthesizer;
mod tree;

pub use errors::HierarchyError;
pub use node::{Node, SiblingSet};
pub use synthesizer::{GlobalPriorities, GlobalWeight, HierarchySynthesizer};
pub use tree::Hierarchy;
