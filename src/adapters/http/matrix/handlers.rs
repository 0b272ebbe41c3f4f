//! HTTP handlers for matrix endpoints.
//!
//! Connect Axum routes to the matrix command and query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use crate::application::handlers::matrix::{
    AggregateGroupCommand, AggregateGroupHandler, AggregateStoredCommand,
    ComputePrioritiesCommand, ComputePrioritiesHandler, EvaluatorInput, GetNextComparisonHandler,
    GetNextComparisonQuery, HandlerError, MatrixLocks, ResetJudgmentCommand, ResetJudgmentHandler,
    SubmitJudgmentCommand, SubmitJudgmentHandler, SynthesizeHierarchyCommand,
    SynthesizeHierarchyHandler,
};
use crate::domain::comparison::{ComparisonError, SaatyScale};
use crate::domain::foundation::{ErrorCode, EvaluatorId, MatrixKey, NodeId};
use crate::domain::priority::{ConsistencyValidator, PriorityEngine};
use crate::ports::{EventPublisher, HierarchyReader, JudgmentRepository};

use super::dto::{
    AggregateRequest, AggregateResponse, AggregateStoredRequest, ErrorResponse,
    NextComparisonResponse, PairQuery, PrioritiesResponse, ResetJudgmentResponse,
    SubmitJudgmentRequest, SubmitJudgmentResponse, SynthesisResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the matrix endpoints.
#[derive(Clone)]
pub struct MatrixAppState {
    pub repository: Arc<dyn JudgmentRepository>,
    pub hierarchy: Arc<dyn HierarchyReader>,
    pub publisher: Arc<dyn EventPublisher>,
    pub locks: MatrixLocks,
    pub engine: PriorityEngine,
    pub validator: ConsistencyValidator,
    pub max_fan_out: usize,
}

impl MatrixAppState {
    pub fn new(
        repository: Arc<dyn JudgmentRepository>,
        hierarchy: Arc<dyn HierarchyReader>,
        publisher: Arc<dyn EventPublisher>,
        engine: PriorityEngine,
        validator: ConsistencyValidator,
        max_fan_out: usize,
    ) -> Self {
        Self {
            repository,
            hierarchy,
            publisher,
            locks: MatrixLocks::new(),
            engine,
            validator,
            max_fan_out,
        }
    }

    pub fn submit_judgment_handler(&self) -> SubmitJudgmentHandler {
        SubmitJudgmentHandler::new(
            self.repository.clone(),
            self.hierarchy.clone(),
            self.locks.clone(),
            self.max_fan_out,
        )
    }

    pub fn reset_judgment_handler(&self) -> ResetJudgmentHandler {
        ResetJudgmentHandler::new(
            self.repository.clone(),
            self.hierarchy.clone(),
            self.locks.clone(),
            self.max_fan_out,
        )
    }

    pub fn next_comparison_handler(&self) -> GetNextComparisonHandler {
        GetNextComparisonHandler::new(
            self.repository.clone(),
            self.hierarchy.clone(),
            self.max_fan_out,
        )
    }

    pub fn compute_priorities_handler(&self) -> ComputePrioritiesHandler {
        ComputePrioritiesHandler::new(
            self.repository.clone(),
            self.hierarchy.clone(),
            self.publisher.clone(),
            self.locks.clone(),
            self.engine,
            self.validator,
            self.max_fan_out,
        )
    }

    pub fn aggregate_group_handler(&self) -> AggregateGroupHandler {
        AggregateGroupHandler::new(
            self.repository.clone(),
            self.hierarchy.clone(),
            self.publisher.clone(),
            self.max_fan_out,
        )
    }

    pub fn synthesize_hierarchy_handler(&self) -> SynthesizeHierarchyHandler {
        SynthesizeHierarchyHandler::new(
            self.repository.clone(),
            self.hierarchy.clone(),
            self.engine,
            self.validator,
            self.max_fan_out,
        )
    }
}

fn parse_node_id(raw: &str) -> Result<NodeId, MatrixApiError> {
    raw.parse()
        .map_err(|_| MatrixApiError::BadRequest(format!("Invalid node ID format: {}", raw)))
}

fn parse_evaluator_id(raw: &str) -> Result<EvaluatorId, MatrixApiError> {
    raw.parse()
        .map_err(|_| MatrixApiError::BadRequest(format!("Invalid evaluator ID format: {}", raw)))
}

fn parse_key(parent_id: &str, evaluator_id: &str) -> Result<MatrixKey, MatrixApiError> {
    Ok(MatrixKey::new(
        parse_node_id(parent_id)?,
        parse_evaluator_id(evaluator_id)?,
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// PUT /api/matrices/:parent_id/evaluators/:evaluator_id/judgments
pub async fn submit_judgment(
    State(state): State<MatrixAppState>,
    Path((parent_id, evaluator_id)): Path<(String, String)>,
    Json(request): Json<SubmitJudgmentRequest>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let key = parse_key(&parent_id, &evaluator_id)?;
    let value = match (request.value, request.level) {
        (Some(value), None) => value,
        (None, Some(level)) => SaatyScale::encode(level),
        _ => {
            return Err(MatrixApiError::BadRequest(
                "Exactly one of value or level is required".to_string(),
            ))
        }
    };

    let result = state
        .submit_judgment_handler()
        .handle(SubmitJudgmentCommand {
            key,
            row: request.row,
            col: request.col,
            value,
            strict: request.strict,
        })
        .await?;

    Ok((StatusCode::OK, Json(SubmitJudgmentResponse::from(result))))
}

/// DELETE /api/matrices/:parent_id/evaluators/:evaluator_id/judgments?row=&col=
pub async fn reset_judgment(
    State(state): State<MatrixAppState>,
    Path((parent_id, evaluator_id)): Path<(String, String)>,
    Query(pair): Query<PairQuery>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let key = parse_key(&parent_id, &evaluator_id)?;
    let result = state
        .reset_judgment_handler()
        .handle(ResetJudgmentCommand {
            key,
            row: pair.row,
            col: pair.col,
        })
        .await?;

    Ok((StatusCode::OK, Json(ResetJudgmentResponse::from(result))))
}

/// POST /api/matrices/:parent_id/evaluators/:evaluator_id/priorities
pub async fn compute_priorities(
    State(state): State<MatrixAppState>,
    Path((parent_id, evaluator_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let key = parse_key(&parent_id, &evaluator_id)?;
    let view = state
        .compute_priorities_handler()
        .handle(ComputePrioritiesCommand { key })
        .await?;

    Ok((StatusCode::OK, Json(PrioritiesResponse::from(view))))
}

/// POST /api/aggregations
pub async fn aggregate(
    State(state): State<MatrixAppState>,
    Json(request): Json<AggregateRequest>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let parent_id = parse_node_id(&request.parent_id)?;
    let evaluators = request
        .evaluators
        .into_iter()
        .map(|e| {
            Ok(EvaluatorInput {
                evaluator_id: parse_evaluator_id(&e.evaluator_id)?,
                weights: e.weights,
                evaluator_weight: e.evaluator_weight,
            })
        })
        .collect::<Result<Vec<_>, MatrixApiError>>()?;

    let view = state
        .aggregate_group_handler()
        .handle(AggregateGroupCommand {
            parent_id,
            evaluators,
        })
        .await?;

    Ok((StatusCode::OK, Json(AggregateResponse::from(view))))
}

/// POST /api/matrices/:parent_id/aggregate
pub async fn aggregate_stored(
    State(state): State<MatrixAppState>,
    Path(parent_id): Path<String>,
    request: Option<Json<AggregateStoredRequest>>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let parent_id = parse_node_id(&parent_id)?;
    let Json(request) = request.unwrap_or_default();
    let evaluator_weights = request
        .evaluator_weights
        .iter()
        .map(|(id, weight)| Ok((parse_evaluator_id(id)?, *weight)))
        .collect::<Result<_, MatrixApiError>>()?;

    let view = state
        .aggregate_group_handler()
        .handle_stored(AggregateStoredCommand {
            parent_id,
            evaluator_weights,
        })
        .await?;

    Ok((StatusCode::OK, Json(AggregateResponse::from(view))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/matrices/:parent_id/evaluators/:evaluator_id/next
pub async fn next_comparison(
    State(state): State<MatrixAppState>,
    Path((parent_id, evaluator_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let key = parse_key(&parent_id, &evaluator_id)?;
    let view = state
        .next_comparison_handler()
        .handle(GetNextComparisonQuery { key })
        .await?;

    Ok((StatusCode::OK, Json(NextComparisonResponse::from(view))))
}

/// GET /api/hierarchies/:root_id/evaluators/:evaluator_id/priorities
pub async fn synthesize(
    State(state): State<MatrixAppState>,
    Path((root_id, evaluator_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, MatrixApiError> {
    let cmd = SynthesizeHierarchyCommand {
        root_id: parse_node_id(&root_id)?,
        evaluator_id: parse_evaluator_id(&evaluator_id)?,
    };
    let view = state.synthesize_hierarchy_handler().handle(cmd).await?;

    Ok((StatusCode::OK, Json(SynthesisResponse::from(view))))
}

/// GET /api/scale
pub async fn scale() -> impl IntoResponse {
    Json(SaatyScale::vocabulary())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts handler errors to HTTP responses.
#[derive(Debug)]
pub enum MatrixApiError {
    BadRequest(String),
    Handler(HandlerError),
}

impl From<HandlerError> for MatrixApiError {
    fn from(err: HandlerError) -> Self {
        MatrixApiError::Handler(err)
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NodeNotFound | ErrorCode::MatrixNotFound => StatusCode::NOT_FOUND,
        ErrorCode::JudgmentConflict
        | ErrorCode::IncompleteMatrix
        | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidIndex
        | ErrorCode::InvalidJudgment
        | ErrorCode::InvalidWeights
        | ErrorCode::MismatchedDimension
        | ErrorCode::EmptyEvaluatorSet
        | ErrorCode::InvalidHierarchy => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::StorageError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn details_for(err: &HandlerError) -> Option<serde_json::Value> {
    match err {
        HandlerError::Comparison(ComparisonError::IncompleteMatrix { answered, required }) => {
            Some(json!({ "answered": answered, "required": required }))
        }
        HandlerError::Comparison(ComparisonError::JudgmentConflict {
            pair,
            existing,
            submitted,
        }) => Some(json!({
            "row": pair.row(),
            "col": pair.col(),
            "existing": existing,
            "submitted": submitted,
        })),
        HandlerError::Domain(err) if !err.details.is_empty() => {
            Some(json!(err.details))
        }
        _ => None,
    }
}

impl IntoResponse for MatrixApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            MatrixApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            MatrixApiError::Handler(err) => {
                let code = err.code();
                let status = status_for(code);
                if status.is_server_error() {
                    error!(code = %code, error = %err, "matrix request failed");
                }
                let mut body = ErrorResponse::new(code.to_string(), err.to_string());
                if let Some(details) = details_for(&err) {
                    body = body.with_details(details);
                }
                (status, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comparison::PairIndex;
    use crate::domain::foundation::DomainError;
    use crate::domain::hierarchy::HierarchyError;

    #[test]
    fn not_found_maps_to_404() {
        let err = MatrixApiError::from(HandlerError::NodeNotFound(NodeId::new()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicts_map_to_409() {
        let pair = PairIndex::new(0, 1).unwrap();
        let err = MatrixApiError::from(HandlerError::Comparison(
            ComparisonError::JudgmentConflict {
                pair,
                existing: 3.0,
                submitted: 5.0,
            },
        ));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err = MatrixApiError::from(HandlerError::Comparison(
            ComparisonError::IncompleteMatrix {
                answered: 1,
                required: 3,
            },
        ));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn rule_violations_map_to_422() {
        let err = MatrixApiError::from(HandlerError::Comparison(
            ComparisonError::invalid_judgment("must be positive"),
        ));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = MatrixApiError::from(HandlerError::Hierarchy(HierarchyError::FanOutExceeded {
            parent: NodeId::new(),
            count: 30,
            max: 20,
        }));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let err = MatrixApiError::from(HandlerError::Domain(DomainError::storage("disk full")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_id_is_bad_request() {
        assert!(matches!(
            parse_key("not-a-uuid", "also-not"),
            Err(MatrixApiError::BadRequest(_))
        ));
    }
}
