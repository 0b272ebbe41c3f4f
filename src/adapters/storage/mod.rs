//! Storage Adapters
//!
//! Implementations of the `JudgmentRepository` port.
//!
//! ## Available Adapters
//!
//! - **FileJudgmentRepository** - One directory per matrix, YAML files on disk
//! - **InMemoryJudgmentRepository** - Everything in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileJudgmentRepository, InMemoryJudgmentRepository};
//!
//! let repo = FileJudgmentRepository::new("./data/judgments");
//! let repo = InMemoryJudgmentRepository::new();
//! ```

mod file_judgment_repository;
mod in_memory_judgment_repository;

pub use file_judgment_repository::FileJudgmentRepository;
pub use in_memory_judgment_repository::InMemoryJudgmentRepository;

use crate::domain::comparison::JudgmentRecord;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Canonical orientation for storage, rejecting self-pairs.
fn canonical_record(record: JudgmentRecord) -> Result<JudgmentRecord, DomainError> {
    if record.row == record.col {
        return Err(DomainError::new(
            ErrorCode::InvalidJudgment,
            format!("Cannot store a judgment of element {} against itself", record.row),
        ));
    }
    Ok(record.canonical())
}
