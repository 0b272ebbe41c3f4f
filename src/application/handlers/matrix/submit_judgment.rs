//! SubmitJudgmentHandler - Records one pairwise judgment.
//!
//! Writes for the same matrix are serialized, so a retried request and the
//! original cannot interleave their read-modify-write cycles.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::comparison::{
    ComparisonSequencer, JudgmentOutcome, JudgmentRecord, NextComparison,
};
use crate::domain::foundation::MatrixKey;
use crate::ports::{HierarchyReader, JudgmentRepository};

use super::loader::load_matrix;
use super::{HandlerError, MatrixLocks};

#[derive(Debug, Clone)]
pub struct SubmitJudgmentCommand {
    pub key: MatrixKey,
    pub row: usize,
    pub col: usize,
    /// Ratio stored at `(row, col)`; above 1 favors the row element.
    pub value: f64,
    /// Refuse to overwrite a differing earlier answer instead of replacing it.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitJudgmentResult {
    pub outcome: JudgmentOutcome,
    pub next: NextComparison,
    pub answered: usize,
    pub required: usize,
}

pub struct SubmitJudgmentHandler {
    repository: Arc<dyn JudgmentRepository>,
    hierarchy: Arc<dyn HierarchyReader>,
    locks: MatrixLocks,
    max_fan_out: usize,
}

impl SubmitJudgmentHandler {
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

    pub async fn handle(
        &self,
        cmd: SubmitJudgmentCommand,
    ) -> Result<SubmitJudgmentResult, HandlerError> {
        let _guard = self.locks.acquire(cmd.key).await;

        // 1. Rebuild the current matrix
        let (_, mut matrix) = load_matrix(
            self.repository.as_ref(),
            self.hierarchy.as_ref(),
            &cmd.key,
            self.max_fan_out,
        )
        .await?;

        // 2. Apply the judgment (validates indices and value)
        let outcome = if cmd.strict {
            matrix.try_set_judgment(cmd.row, cmd.col, cmd.value)?
        } else {
            matrix.set_judgment(cmd.row, cmd.col, cmd.value)?
        };

        // 3. Persist unless it was a duplicate
        match outcome {
            JudgmentOutcome::Unchanged => {
                debug!(matrix = %cmd.key, row = cmd.row, col = cmd.col, "duplicate judgment ignored");
            }
            JudgmentOutcome::Recorded | JudgmentOutcome::Replaced { .. } => {
                self.repository
                    .save_judgment(JudgmentRecord::new(cmd.key, cmd.row, cmd.col, cmd.value))
                    .await?;
            }
        }
        if let JudgmentOutcome::Replaced { previous } = outcome {
            warn!(
                matrix = %cmd.key,
                row = cmd.row,
                col = cmd.col,
                previous,
                value = cmd.value,
                "judgment replaced an earlier answer"
            );
        }

        let (answered, required) = ComparisonSequencer::progress(matrix.answered());
        debug!(matrix = %cmd.key, answered, required, "judgment recorded");

        Ok(SubmitJudgmentResult {
            outcome,
            next: ComparisonSequencer::next(matrix.answered()),
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
    use crate::domain::comparison::ComparisonError;
    use crate::domain::foundation::{EvaluatorId, NodeId};
    use crate::domain::hierarchy::Node;

    async fn setup(children: u32) -> (SubmitJudgmentHandler, Arc<InMemoryJudgmentRepository>, MatrixKey) {
        let hierarchy = Arc::new(InMemoryHierarchy::new());
        let goal = Node::root("Goal");
        let mut nodes: Vec<_> = (0..children)
            .map(|i| Node::child(goal.id, format!("C{}", i), i))
            .collect();
        let key = MatrixKey::new(goal.id, EvaluatorId::new());
        nodes.push(goal);
        hierarchy.insert_nodes(nodes).await.unwrap();

        let repository = Arc::new(InMemoryJudgmentRepository::new());
        let handler = SubmitJudgmentHandler::new(
            repository.clone(),
            hierarchy,
            MatrixLocks::new(),
            20,
        );
        (handler, repository, key)
    }

    fn cmd(key: MatrixKey, row: usize, col: usize, value: f64) -> SubmitJudgmentCommand {
        SubmitJudgmentCommand {
            key,
            row,
            col,
            value,
            strict: false,
        }
    }

    #[tokio::test]
    async fn records_and_advances_sequencer() {
        let (handler, repository, key) = setup(3).await;
        let result = handler.handle(cmd(key, 0, 1, 3.0)).await.unwrap();

        assert_eq!(result.outcome, JudgmentOutcome::Recorded);
        assert_eq!(result.next, NextComparison::Pair { row: 0, col: 2 });
        assert_eq!((result.answered, result.required), (1, 3));
        assert_eq!(repository.judgment_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_submission_is_a_no_op() {
        let (handler, _, key) = setup(2).await;
        handler.handle(cmd(key, 0, 1, 3.0)).await.unwrap();
        let again = handler.handle(cmd(key, 0, 1, 3.0)).await.unwrap();

        assert_eq!(again.outcome, JudgmentOutcome::Unchanged);
        assert_eq!(again.next, NextComparison::Complete);
    }

    #[tokio::test]
    async fn differing_value_is_reported_or_refused() {
        let (handler, _, key) = setup(2).await;
        handler.handle(cmd(key, 0, 1, 3.0)).await.unwrap();

        let replaced = handler.handle(cmd(key, 0, 1, 5.0)).await.unwrap();
        assert_eq!(replaced.outcome, JudgmentOutcome::Replaced { previous: 3.0 });

        let strict = SubmitJudgmentCommand {
            strict: true,
            ..cmd(key, 0, 1, 7.0)
        };
        assert!(matches!(
            handler.handle(strict).await,
            Err(HandlerError::Comparison(ComparisonError::JudgmentConflict { .. }))
        ));
    }

    #[tokio::test]
    async fn invalid_judgments_are_never_persisted() {
        let (handler, repository, key) = setup(2).await;
        assert!(handler.handle(cmd(key, 0, 5, 3.0)).await.is_err());
        assert!(handler.handle(cmd(key, 1, 1, 3.0)).await.is_err());
        assert!(handler.handle(cmd(key, 0, 1, -1.0)).await.is_err());
        assert_eq!(repository.judgment_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_parent_is_not_found() {
        let (handler, _, key) = setup(2).await;
        let other = MatrixKey::new(NodeId::new(), key.evaluator_id);
        assert!(matches!(
            handler.handle(cmd(other, 0, 1, 2.0)).await,
            Err(HandlerError::NodeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_duplicates_record_once() {
        let (handler, repository, key) = setup(2).await;
        let handler = Arc::new(handler);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(cmd(key, 0, 1, 4.0)).await })
            })
            .collect();

        let mut recorded = 0;
        for task in tasks {
            if task.await.unwrap().unwrap().outcome == JudgmentOutcome::Recorded {
                recorded += 1;
            }
        }
        assert_eq!(recorded, 1);
        assert_eq!(repository.judgment_count().await, 1);
    }
}
