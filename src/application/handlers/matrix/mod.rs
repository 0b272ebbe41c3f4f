//! Matrix command and query handlers.
//!
//! Writes to one matrix are serialized through `MatrixLocks`; reads and
//! priority computation work on snapshots.

mod aggregate_group;
mod compute_priorities;
mod errors;
mod get_next_comparison;
mod loader;
mod locks;
mod reset_judgment;
mod submit_judgment;
mod synthesize_hierarchy;

pub use aggregate_group::{
    AggregateGroupCommand, AggregateGroupHandler, AggregateStoredCommand, EvaluatorInput,
    GroupPriorityView, RankedNodeView, DEFAULT_EVALUATOR_WEIGHT,
};
pub use compute_priorities::{ComputePrioritiesCommand, ComputePrioritiesHandler, PrioritiesView};
pub use errors::HandlerError;
pub use get_next_comparison::{
    GetNextComparisonHandler, GetNextComparisonQuery, NextComparisonView,
};
pub use locks::MatrixLocks;
pub use reset_judgment::{ResetJudgmentCommand, ResetJudgmentHandler, ResetJudgmentResult};
pub use submit_judgment::{SubmitJudgmentCommand, SubmitJudgmentHandler, SubmitJudgmentResult};
pub use synthesize_hierarchy::{
    HierarchyPrioritiesView, SynthesizeHierarchyCommand, SynthesizeHierarchyHandler,
};
