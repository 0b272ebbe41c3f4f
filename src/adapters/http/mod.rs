//! HTTP adapters - REST API implementations.

pub mod matrix;

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use matrix::{matrix_router, MatrixApiError, MatrixAppState};

/// Full API router with request tracing and a per-request timeout.
pub fn api_router(state: MatrixAppState, request_timeout: Duration) -> Router {
    matrix_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
