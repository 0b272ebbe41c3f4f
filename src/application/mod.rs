//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations across the ports. Commands change a matrix;
//! queries and computations read snapshots.

pub mod handlers;

pub use handlers::{
    AggregateGroupHandler, ComputePrioritiesHandler, GetNextComparisonHandler, HandlerError,
    MatrixLocks, ResetJudgmentHandler, SubmitJudgmentHandler, SynthesizeHierarchyHandler,
};
