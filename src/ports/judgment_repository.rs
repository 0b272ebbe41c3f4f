//! Judgment repository port.
//!
//! Persists raw judgment records keyed by (matrix identity, row, col) and the
//! priority result last computed from them.
//!
//! # Contract
//!
//! - Records are stored in canonical orientation (`row < col`); a later record
//!   for the same pair replaces the earlier one.
//! - Writing or clearing a judgment drops any stored result for that matrix,
//!   since the result belongs to the previous matrix version.

use async_trait::async_trait;

use crate::domain::comparison::JudgmentRecord;
use crate::domain::foundation::{DomainError, MatrixKey, NodeId};
use crate::domain::priority::PriorityResult;

#[async_trait]
pub trait JudgmentRepository: Send + Sync {
    /// All answered judgments for a matrix, empty if none.
    async fn load_judgments(&self, key: &MatrixKey) -> Result<Vec<JudgmentRecord>, DomainError>;

    /// Upserts one judgment.
    async fn save_judgment(&self, record: JudgmentRecord) -> Result<(), DomainError>;

    /// Removes one judgment. Returns false if it was not stored.
    async fn clear_judgment(
        &self,
        key: &MatrixKey,
        row: usize,
        col: usize,
    ) -> Result<bool, DomainError>;

    async fn save_result(&self, result: &PriorityResult) -> Result<(), DomainError>;

    async fn load_result(&self, key: &MatrixKey) -> Result<Option<PriorityResult>, DomainError>;

    /// Stored results of every evaluator for one parent, ordered by evaluator id.
    async fn list_results(&self, parent_id: NodeId) -> Result<Vec<PriorityResult>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn JudgmentRepository) {}
}
