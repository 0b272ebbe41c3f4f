//! ResetJudgmentHandler - Clears one judgment so it will be asked again.

use std::sync::Arc;

use tracing::debug;

use crate::domain::comparison::{ComparisonSequencer, NextComparison};
use crate::domain::foundation::MatrixKey;
use crate::ports::{HierarchyReader, JudgmentRepository};

use super::loader::load_matrix;
use super::{HandlerError, MatrixLocks};

#[derive(Debug, Clone)]
pub struct ResetJudgmentCommand {
    pub key: MatrixKey,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetJudgmentResult {
    /// False when the pair had no judgment.
    pub cleared: bool,
    pub next: NextComparison,
}

pub struct ResetJudgmentHandler {
    repository: Arc<dyn JudgmentRepository>,
    hierarchy: Arc<dyn HierarchyReader>,
    locks: MatrixLocks,
    max_fan_out: usize,
}

impl ResetJudgmentHandler {
    pub fn new(
        repository: Arc<dyn JudgmentRepository>,
        hierarchy: Arc<dyn HierarchyReader>,
        locks: MatrixLocks,
        max_fan_out: usize,
    ) -> Self {
        Self {
            repository,
            hierarchy,
            locks,
            max_fan_out,
        }
    }

    pub async fn handle(&self, cmd: ResetJudgmentCommand) -> Result<ResetJudgmentResult, HandlerError> {
        let _guard = self.locks.acquire(cmd.key).await;

        let (_, mut matrix) = load_matrix(
            self.repository.as_ref(),
            self.hierarchy.as_ref(),
            &cmd.key,
            self.max_fan_out,
        )
        .await?;

        let cleared = matrix.reset_judgment(cmd.row, cmd.col)?;
        if cleared {
            self.repository
                .clear_judgment(&cmd.key, cmd.row, cmd.col)
                .await?;
            debug!(matrix = %cmd.key, row = cmd.row, col = cmd.col, "judgment cleared");
        }

        Ok(ResetJudgmentResult {
            cleared,
            next: ComparisonSequencer::next(matrix.answered()),
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
    use crate::domain::hierarchy::Node;

    #[tokio::test]
    async fn clears_and_reopens_pair() {
        let hierarchy = Arc::new(InMemoryHierarchy::new());
        let goal = Node::root("Goal");
        let key = MatrixKey::new(goal.id, EvaluatorId::new());
        hierarchy
            .insert_nodes(vec![
                Node::child(goal.id, "A", 0),
                Node::child(goal.id, "B", 1),
                goal,
            ])
            .await
            .unwrap();
        let repository = Arc::new(InMemoryJudgmentRepository::new());
        repository
            .save_judgment(JudgmentRecord::new(key, 0, 1, 2.0))
            .await
            .unwrap();

        let handler =
            ResetJudgmentHandler::new(repository.clone(), hierarchy, MatrixLocks::new(), 20);
        let result = handler
            .handle(ResetJudgmentCommand { key, row: 1, col: 0 })
            .await
            .unwrap();

        assert!(result.cleared);
        assert_eq!(result.next, NextComparison::Pair { row: 0, col: 1 });
        assert_eq!(repository.judgment_count().await, 0);

        let again = handler
            .handle(ResetJudgmentCommand { key, row: 0, col: 1 })
            .await
            .unwrap();
        assert!(!again.cleared);
    }
}
