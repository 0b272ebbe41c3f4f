//! Integration tests for multi-evaluator aggregation and hierarchy synthesis.
//!
//! Several evaluators judge the same parent; their stored results are then
//! combined with the weighted geometric mean and ranked.

use std::collections::HashMap;
use std::sync::Arc;

use ahp_engine::adapters::{InMemoryEventBus, InMemoryHierarchy, InMemoryJudgmentRepository};
use ahp_engine::application::handlers::matrix::{
    AggregateGroupCommand, AggregateGroupHandler, AggregateStoredCommand,
    ComputePrioritiesCommand, ComputePrioritiesHandler, EvaluatorInput, HandlerError, MatrixLocks,
    SynthesizeHierarchyCommand, SynthesizeHierarchyHandler,
};
use ahp_engine::domain::comparison::{ComparisonError, JudgmentRecord};
use ahp_engine::domain::foundation::{EvaluatorId, MatrixKey, NodeId};
use ahp_engine::domain::hierarchy::Node;
use ahp_engine::domain::priority::{ConsistencyValidator, PriorityEngine};
use ahp_engine::ports::JudgmentRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct World {
    repository: Arc<InMemoryJudgmentRepository>,
    bus: Arc<InMemoryEventBus>,
    compute: ComputePrioritiesHandler,
    aggregate: AggregateGroupHandler,
    synthesize: SynthesizeHierarchyHandler,
    goal: NodeId,
    criteria: Vec<NodeId>,
    /// Alternatives under each criterion, same order everywhere: Rent, Buy.
    alternatives: HashMap<NodeId, Vec<NodeId>>,
}

async fn world() -> World {
    let goal = Node::root("Housing");
    let cost = Node::child(goal.id, "Cost", 0);
    let location = Node::child(goal.id, "Location", 1);
    let space = Node::child(goal.id, "Space", 2);
    let criteria = vec![cost.id, location.id, space.id];

    let mut nodes = vec![];
    let mut alternatives = HashMap::new();
    for criterion in &criteria {
        let rent = Node::child(*criterion, "Rent", 0);
        let buy = Node::child(*criterion, "Buy", 1);
        alternatives.insert(*criterion, vec![rent.id, buy.id]);
        nodes.push(rent);
        nodes.push(buy);
    }
    let goal_id = goal.id;
    nodes.extend([goal, cost, location, space]);

    let hierarchy = Arc::new(InMemoryHierarchy::new());
    hierarchy.insert_nodes(nodes).await.unwrap();
    let repository = Arc::new(InMemoryJudgmentRepository::new());
    let bus = Arc::new(InMemoryEventBus::new());

    World {
        compute: ComputePrioritiesHandler::new(
            repository.clone(),
            hierarchy.clone(),
            bus.clone(),
            MatrixLocks::new(),
            PriorityEngine::default(),
            ConsistencyValidator::default(),
            20,
        ),
        aggregate: AggregateGroupHandler::new(repository.clone(), hierarchy.clone(), bus.clone(), 20),
        synthesize: SynthesizeHierarchyHandler::new(
            repository.clone(),
            hierarchy,
            PriorityEngine::default(),
            ConsistencyValidator::default(),
            20,
        ),
        repository,
        bus,
        goal: goal_id,
        criteria,
        alternatives,
    }
}

async fn judge(w: &World, key: MatrixKey, judgments: &[(usize, usize, f64)]) {
    for (row, col, value) in judgments {
        w.repository
            .save_judgment(JudgmentRecord::new(key, *row, *col, *value))
            .await
            .unwrap();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn stored_results_aggregate_into_group_ranking() {
    let w = world().await;
    let alice = EvaluatorId::new();
    let bob = EvaluatorId::new();

    // Alice: Cost dominates. Bob: Location dominates.
    judge(&w, MatrixKey::new(w.goal, alice), &[(0, 1, 5.0), (0, 2, 7.0), (1, 2, 2.0)]).await;
    judge(&w, MatrixKey::new(w.goal, bob), &[(0, 1, 0.5), (0, 2, 3.0), (1, 2, 5.0)]).await;
    for evaluator in [alice, bob] {
        w.compute
            .handle(ComputePrioritiesCommand {
                key: MatrixKey::new(w.goal, evaluator),
            })
            .await
            .unwrap();
    }

    let view = w
        .aggregate
        .handle_stored(AggregateStoredCommand {
            parent_id: w.goal,
            evaluator_weights: HashMap::new(),
        })
        .await
        .unwrap();

    assert_eq!(view.evaluators.len(), 2);
    assert_eq!(view.ranking[0].node_id, w.criteria[0]);
    assert_eq!(view.ranking[0].name, "Cost");
    assert_eq!(view.ranking[2].node_id, w.criteria[2]);
    let total: f64 = view.group.vector.weights().iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(w.bus.events_of_type("priority.group_aggregated.v1").await.len(), 1);

    // Giving Bob all the say makes Location win.
    let view = w
        .aggregate
        .handle_stored(AggregateStoredCommand {
            parent_id: w.goal,
            evaluator_weights: HashMap::from([(alice, 0.01), (bob, 10.0)]),
        })
        .await
        .unwrap();
    assert_eq!(view.ranking[0].node_id, w.criteria[1]);
}

#[tokio::test]
async fn identical_evaluators_aggregate_to_their_shared_vector() {
    let w = world().await;
    let weights = vec![0.5, 0.3, 0.2];
    let view = w
        .aggregate
        .handle(AggregateGroupCommand {
            parent_id: w.goal,
            evaluators: (0..3)
                .map(|_| EvaluatorInput {
                    evaluator_id: EvaluatorId::new(),
                    weights: weights.clone(),
                    evaluator_weight: None,
                })
                .collect(),
        })
        .await
        .unwrap();

    for (aggregated, original) in view.group.vector.weights().iter().zip(&weights) {
        assert!((aggregated - original).abs() < 1e-12);
    }
    let ranks: Vec<_> = view.ranking.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn invalid_evaluator_weight_is_rejected() {
    let w = world().await;
    let err = w
        .aggregate
        .handle(AggregateGroupCommand {
            parent_id: w.goal,
            evaluators: vec![
                EvaluatorInput {
                    evaluator_id: EvaluatorId::new(),
                    weights: vec![0.5, 0.3, 0.2],
                    evaluator_weight: Some(0.0),
                },
                EvaluatorInput {
                    evaluator_id: EvaluatorId::new(),
                    weights: vec![0.2, 0.3, 0.5],
                    evaluator_weight: Some(1.0),
                },
            ],
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::Comparison(ComparisonError::InvalidEvaluatorWeight { .. })
    ));
}

#[tokio::test]
async fn synthesis_combines_criteria_and_alternatives() {
    let w = world().await;
    let evaluator = EvaluatorId::new();

    // Criteria: Cost 0.6, Location 0.3, Space 0.1 (perfectly consistent).
    judge(&w, MatrixKey::new(w.goal, evaluator), &[(0, 1, 2.0), (0, 2, 6.0), (1, 2, 3.0)]).await;
    // Rent vs Buy under each criterion.
    let local = [(w.criteria[0], 3.0), (w.criteria[1], 1.0), (w.criteria[2], 0.25)];
    for (criterion, value) in local {
        judge(&w, MatrixKey::new(criterion, evaluator), &[(0, 1, value)]).await;
    }

    let view = w
        .synthesize
        .handle(SynthesizeHierarchyCommand {
            root_id: w.goal,
            evaluator_id: evaluator,
        })
        .await
        .unwrap();

    assert_eq!(view.local.len(), 4);
    assert!(view.inconsistent_parents().is_empty());
    assert_eq!(view.global.alternatives.len(), 6);

    // Rent under Cost: 0.6 * 0.75
    let rent_cost = w.alternatives[&w.criteria[0]][0];
    assert!((view.global.weight_of(rent_cost).unwrap() - 0.45).abs() < 1e-9);
    assert_eq!(view.global.alternatives[0].node_id, rent_cost);

    // Buy under Space: 0.1 * 0.8
    let buy_space = w.alternatives[&w.criteria[2]][1];
    assert!((view.global.weight_of(buy_space).unwrap() - 0.08).abs() < 1e-9);
}
