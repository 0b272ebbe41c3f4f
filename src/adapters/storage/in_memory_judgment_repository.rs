//! In-Memory Judgment Repository
//!
//! Keeps judgments and results in memory. Used by tests and the default
//! development server.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::canonical_record;
use crate::domain::comparison::JudgmentRecord;
use crate::domain::foundation::{DomainError, MatrixKey, NodeId};
use crate::domain::priority::PriorityResult;
use crate::ports::JudgmentRepository;

type PairMap = BTreeMap<(usize, usize), JudgmentRecord>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryJudgmentRepository {
    judgments: Arc<RwLock<HashMap<MatrixKey, PairMap>>>,
    results: Arc<RwLock<HashMap<MatrixKey, PriorityResult>>>,
}

impl InMemoryJudgmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored judgments across all matrices.
    pub async fn judgment_count(&self) -> usize {
        self.judgments.read().await.values().map(|m| m.len()).sum()
    }

    pub async fn result_count(&self) -> usize {
        self.results.read().await.len()
    }

    pub async fn clear(&self) {
        self.judgments.write().await.clear();
        self.results.write().await.clear();
    }
}

#[async_trait]
impl JudgmentRepository for InMemoryJudgmentRepository {
    async fn load_judgments(&self, key: &MatrixKey) -> Result<Vec<JudgmentRecord>, DomainError> {
        Ok(self
            .judgments
            .read()
            .await
            .get(key)
            .map(|pairs| pairs.values().copied().collect())
            .unwrap_or_default())
    }

    async fn save_judgment(&self, record: JudgmentRecord) -> Result<(), DomainError> {
        let record = canonical_record(record)?;
        self.judgments
            .write()
            .await
            .entry(record.matrix)
            .or_default()
            .insert((record.row, record.col), record);
        self.results.write().await.remove(&record.matrix);
        Ok(())
    }

    async fn clear_judgment(
        &self,
        key: &MatrixKey,
        row: usize,
        col: usize,
    ) -> Result<bool, DomainError> {
        let pair = (row.min(col), row.max(col));
        let removed = self
            .judgments
            .write()
            .await
            .get_mut(key)
            .map(|pairs| pairs.remove(&pair).is_some())
            .unwrap_or(false);
        if removed {
            self.results.write().await.remove(key);
        }
        Ok(removed)
    }

    async fn save_result(&self, result: &PriorityResult) -> Result<(), DomainError> {
        self.results
            .write()
            .await
            .insert(result.matrix, result.clone());
        Ok(())
    }

    async fn load_result(&self, key: &MatrixKey) -> Result<Option<PriorityResult>, DomainError> {
        Ok(self.results.read().await.get(key).cloned())
    }

    async fn list_results(&self, parent_id: NodeId) -> Result<Vec<PriorityResult>, DomainError> {
        let mut results: Vec<PriorityResult> = self
            .results
            .read()
            .await
            .values()
            .filter(|r| r.matrix.parent_id == parent_id)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.matrix.evaluator_id);
        Ok(results)
    }
}
