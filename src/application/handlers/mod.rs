//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod matrix;

pub use matrix::{
    // Commands and queries
    AggregateGroupCommand, AggregateStoredCommand, ComputePrioritiesCommand,
    GetNextComparisonQuery, ResetJudgmentCommand, SubmitJudgmentCommand,
    SynthesizeHierarchyCommand,
    // Handlers
    AggregateGroupHandler, ComputePrioritiesHandler, GetNextComparisonHandler,
    ResetJudgmentHandler, SubmitJudgmentHandler, SynthesizeHierarchyHandler,
    // Results
    GroupPriorityView, HierarchyPrioritiesView, NextComparisonView, PrioritiesView,
    RankedNodeView, ResetJudgmentResult, SubmitJudgmentResult,
    // Support
    EvaluatorInput, HandlerError, MatrixLocks,
};
