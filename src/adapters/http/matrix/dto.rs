//! HTTP DTOs for matrix endpoints.
//!
//! JSON boundary between the REST API and the matrix handlers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::matrix::{
    GroupPriorityView, HierarchyPrioritiesView, NextComparisonView, PrioritiesView,
    ResetJudgmentResult, SubmitJudgmentResult,
};
use crate::domain::comparison::{ElicitationPhase, JudgmentOutcome, NextComparison, ScaleLevel};
use crate::domain::hierarchy::Node;
use crate::domain::priority::{DerivationMethod, WorstPair};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Judgment for one pair. Exactly one of `value` or `level` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitJudgmentRequest {
    pub row: usize,
    pub col: usize,
    /// Ratio stored at `(row, col)`.
    #[serde(default)]
    pub value: Option<f64>,
    /// Qualitative alternative to `value`.
    #[serde(default)]
    pub level: Option<ScaleLevel>,
    /// Reject instead of replacing a differing earlier answer.
    #[serde(default)]
    pub strict: bool,
}

/// Query string of `DELETE .../judgments`.
#[derive(Debug, Clone, Deserialize)]
pub struct PairQuery {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorWeightsRequest {
    pub evaluator_id: String,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub evaluator_weight: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateRequest {
    pub parent_id: String,
    pub evaluators: Vec<EvaluatorWeightsRequest>,
}

/// Aggregation over stored results. Unlisted evaluators weigh 1.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateStoredRequest {
    #[serde(default)]
    pub evaluator_weights: HashMap<String, f64>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct NodeResponse {
    pub id: String,
    pub name: String,
}

impl From<&Node> for NodeResponse {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            name: node.name.clone(),
        }
    }
}

/// Next pair to present, with the nodes behind it.
#[derive(Debug, Clone, Serialize)]
pub struct NextPairResponse {
    pub row: usize,
    pub col: usize,
    pub row_node: NodeResponse,
    pub col_node: NodeResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextComparisonResponse {
    pub state: ElicitationPhase,
    pub answered: usize,
    pub required: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NextPairResponse>,
}

impl From<NextComparisonView> for NextComparisonResponse {
    fn from(view: NextComparisonView) -> Self {
        let next = match (view.next, view.nodes) {
            (NextComparison::Pair { row, col }, Some((r, c))) => {
                Some(NextPairResponse {
                    row,
                    col,
                    row_node: NodeResponse::from(&r),
                    col_node: NodeResponse::from(&c),
                })
            }
            _ => None,
        };
        Self {
            state: view.phase,
            answered: view.answered,
            required: view.required,
            next,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitJudgmentResponse {
    pub outcome: JudgmentOutcome,
    pub next: NextComparison,
    pub answered: usize,
    pub required: usize,
}

impl From<SubmitJudgmentResult> for SubmitJudgmentResponse {
    fn from(result: SubmitJudgmentResult) -> Self {
        Self {
            outcome: result.outcome,
            next: result.next,
            answered: result.answered,
            required: result.required,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetJudgmentResponse {
    pub cleared: bool,
    pub next: NextComparison,
}

impl From<ResetJudgmentResult> for ResetJudgmentResponse {
    fn from(result: ResetJudgmentResult) -> Self {
        Self {
            cleared: result.cleared,
            next: result.next,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrioritiesResponse {
    /// Aligned with `node_ids`.
    pub weights: Vec<f64>,
    pub node_ids: Vec<String>,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub consistency_ratio: f64,
    pub consistent: bool,
    pub approximate: bool,
    pub method: DerivationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_pair: Option<WorstPair>,
}

impl From<PrioritiesView> for PrioritiesResponse {
    fn from(view: PrioritiesView) -> Self {
        let result = view.result;
        Self {
            weights: result.vector.weights().to_vec(),
            node_ids: view.node_ids.iter().map(|id| id.to_string()).collect(),
            lambda_max: result.lambda_max,
            consistency_index: result.consistency.consistency_index,
            consistency_ratio: result.consistency.consistency_ratio,
            consistent: result.consistency.is_consistent(),
            approximate: result.is_approximate(),
            method: result.method,
            worst_pair: result.consistency.worst_pair,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedNodeResponse {
    pub node_id: String,
    pub name: String,
    pub rank: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateResponse {
    pub parent_id: String,
    pub weights: Vec<f64>,
    pub evaluator_ids: Vec<String>,
    pub evaluator_weights: Vec<f64>,
    pub ranking: Vec<RankedNodeResponse>,
}

impl From<GroupPriorityView> for AggregateResponse {
    fn from(view: GroupPriorityView) -> Self {
        Self {
            parent_id: view.parent_id.to_string(),
            weights: view.group.vector.weights().to_vec(),
            evaluator_ids: view.evaluators.iter().map(|id| id.to_string()).collect(),
            evaluator_weights: view.group.evaluator_weights,
            ranking: view
                .ranking
                .into_iter()
                .map(|r| RankedNodeResponse {
                    node_id: r.node_id.to_string(),
                    name: r.name,
                    rank: r.rank,
                    weight: r.weight,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GlobalWeightResponse {
    pub node_id: String,
    pub rank: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResponse {
    pub root_id: String,
    pub evaluator_id: String,
    pub alternatives: Vec<GlobalWeightResponse>,
    pub inconsistent_parents: Vec<String>,
    pub approximate: bool,
}

impl From<HierarchyPrioritiesView> for SynthesisResponse {
    fn from(view: HierarchyPrioritiesView) -> Self {
        Self {
            root_id: view.root_id.to_string(),
            evaluator_id: view.evaluator_id.to_string(),
            inconsistent_parents: view
                .inconsistent_parents()
                .iter()
                .map(|id| id.to_string())
                .collect(),
            approximate: view.local.iter().any(|r| r.is_approximate()),
            alternatives: view
                .global
                .alternatives
                .into_iter()
                .map(|g| GlobalWeightResponse {
                    node_id: g.node_id.to_string(),
                    rank: g.rank,
                    weight: g.weight,
                })
                .collect(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
