//! GetNextComparisonHandler - What to ask an evaluator next.

use std::sync::Arc;

use crate::domain::comparison::{ComparisonSequencer, ElicitationPhase, NextComparison};
use crate::domain::foundation::MatrixKey;
use crate::domain::hierarchy::Node;
use crate::ports::{HierarchyReader, JudgmentRepository};

use super::loader::load_matrix;
use super::HandlerError;

#[derive(Debug, Clone)]
pub struct GetNextComparisonQuery {
    pub key: MatrixKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextComparisonView {
    pub phase: ElicitationPhase,
    pub next: NextComparison,
    /// The two nodes behind `next`, in (row, column) order.
    pub nodes: Option<(Node, Node)>,
    pub answered: usize,
    pub required: usize,
}

pub struct GetNextComparisonHandler {
    repository: Arc<dyn JudgmentRepository>,
    hierarchy: Arc<dyn HierarchyReader>,
    max_fan_out: usize,
}

impl GetNextComparisonHandler {
    pub fn new(
        repository: Arc<dyn JudgmentRepository>,
        hierarchy: Arc<dyn HierarchyReader>,
        max_fan_out: usize,
    ) -> Self {
        Self {
            repository,
            hierarchy,
            max_fan_out,
        }
    }

    pub async fn handle(&self, query: GetNextComparisonQuery) -> Result<NextComparisonView, HandlerError> {
        let (siblings, matrix) = load_matrix(
            self.repository.as_ref(),
            self.hierarchy.as_ref(),
            &query.key,
            self.max_fan_out,
        )
        .await?;

        let answered_set = matrix.answered();
        let next = ComparisonSequencer::next(answered_set);
        let nodes = match next {
            NextComparison::Pair { row, col } => siblings
                .get(row)
                .cloned()
                .zip(siblings.get(col).cloned()),
            NextComparison::Complete => None,
        };
        let (answered, required) = ComparisonSequencer::progress(answered_set);

        Ok(NextComparisonView {
            phase: ComparisonSequencer::phase(answered_set),
            next,
            nodes,
            answered,
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::hierarchy::InMemoryHierarchy;
    use crate::adapters::storage::InMemoryJudgmentRepository;
    use crate::domain::comparison::JudgmentRecord;
    use crate::domain::foundation::EvaluatorId;

    async fn setup(children: u32) -> (GetNextComparisonHandler, Arc<InMemoryJudgmentRepository>, MatrixKey) {
        let hierarchy = Arc::new(InMemoryHierarchy::new());
        let goal = Node::root("Goal");
        let key = MatrixKey::new(goal.id, EvaluatorId::new());
        let mut nodes: Vec<_> = (0..children)
            .map(|i| Node::child(goal.id, format!("C{}", i), i))
            .collect();
        nodes.push(goal);
        hierarchy.insert_nodes(nodes).await.unwrap();
        let repository = Arc::new(InMemoryJudgmentRepository::new());
        (
            GetNextComparisonHandler::new(repository.clone(), hierarchy, 20),
            repository,
            key,
        )
    }

    #[tokio::test]
    async fn fresh_matrix_asks_first_pair_with_labels() {
        let (handler, _, key) = setup(3).await;
        let view = handler.handle(GetNextComparisonQuery { key }).await.unwrap();

        assert_eq!(view.phase, ElicitationPhase::Answering);
        assert_eq!(view.next, NextComparison::Pair { row: 0, col: 1 });
        let (row, col) = view.nodes.unwrap();
        assert_eq!((row.name.as_str(), col.name.as_str()), ("C0", "C1"));
        assert_eq!((view.answered, view.required), (0, 3));
    }

    #[tokio::test]
    async fn resumes_after_stored_judgments() {
        let (handler, repository, key) = setup(3).await;
        repository
            .save_judgment(JudgmentRecord::new(key, 0, 1, 1.0))
            .await
            .unwrap();

        let view = handler.handle(GetNextComparisonQuery { key }).await.unwrap();
        assert_eq!(view.next, NextComparison::Pair { row: 0, col: 2 });
    }

    #[tokio::test]
    async fn single_child_is_complete_immediately() {
        let (handler, _, key) = setup(1).await;
        let view = handler.handle(GetNextComparisonQuery { key }).await.unwrap();

        assert_eq!(view.phase, ElicitationPhase::Complete);
        assert_eq!(view.next, NextComparison::Complete);
        assert_eq!(view.required, 0);
        assert!(view.nodes.is_none());
    }

    #[tokio::test]
    async fn fan_out_limit_applies() {
        let hierarchy = Arc::new(InMemoryHierarchy::new());
        let goal = Node::root("Goal");
        let key = MatrixKey::new(goal.id, EvaluatorId::new());
        let mut nodes: Vec<_> = (0..4).map(|i| Node::child(goal.id, "N", i)).collect();
        nodes.push(goal);
        hierarchy.insert_nodes(nodes).await.unwrap();

        let handler =
            GetNextComparisonHandler::new(Arc::new(InMemoryJudgmentRepository::new()), hierarchy, 3);
        assert!(matches!(
            handler.handle(GetNextComparisonQuery { key }).await,
            Err(HandlerError::Hierarchy(_))
        ));
    }
}
