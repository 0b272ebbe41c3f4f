//! HTTP adapter for pairwise comparison matrices.
//!
//! # Endpoints
//!
//! - `PUT /api/matrices/:parent_id/evaluators/:evaluator_id/judgments` - Record a judgment
//! - `DELETE /api/matrices/:parent_id/evaluators/:evaluator_id/judgments` - Clear a judgment
//! - `GET /api/matrices/:parent_id/evaluators/:evaluator_id/next` - Next pair to ask
//! - `POST /api/matrices/:parent_id/evaluators/:evaluator_id/priorities` - Derive priorities
//! - `POST /api/matrices/:parent_id/aggregate` - Aggregate stored evaluator results
//! - `POST /api/aggregations` - Aggregate supplied vectors
//! - `GET /api/hierarchies/:root_id/evaluators/:evaluator_id/priorities` - Global weights
//! - `GET /api/scale` - Scale vocabulary

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{MatrixApiError, MatrixAppState};
pub use routes::matrix_router;
