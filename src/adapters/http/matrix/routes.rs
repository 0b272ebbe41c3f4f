//! Route configuration for matrix endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    aggregate, aggregate_stored, compute_priorities, next_comparison, reset_judgment, scale,
    submit_judgment, synthesize, MatrixAppState,
};

/// Creates the matrix router with all endpoints.
pub fn matrix_router() -> Router<MatrixAppState> {
    Router::new()
        .route(
            "/api/matrices/:parent_id/evaluators/:evaluator_id/judgments",
            put(submit_judgment).delete(reset_judgment),
        )
        .route(
            "/api/matrices/:parent_id/evaluators/:evaluator_id/next",
            get(next_comparison),
        )
        .route(
            "/api/matrices/:parent_id/evaluators/:evaluator_id/priorities",
            post(compute_priorities),
        )
        .route("/api/matrices/:parent_id/aggregate", post(aggregate_stored))
        .route("/api/aggregations", post(aggregate))
        .route(
            "/api/hierarchies/:root_id/evaluators/:evaluator_id/priorities",
            get(synthesize),
        )
        .route("/api/scale", get(scale))
}
