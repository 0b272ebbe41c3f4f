//! File-based Judgment Repository
//!
//! Stores each matrix as YAML files on disk:
//!
//! ```text
//! <base>/<parent_id>/<evaluator_id>/judgments.yaml
//! <base>/<parent_id>/<evaluator_id>/result.yaml
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use super::canonical_record;
use crate::domain::comparison::JudgmentRecord;
use crate::domain::foundation::{DomainError, EvaluatorId, MatrixKey, NodeId};
use crate::domain::priority::PriorityResult;
use crate::ports::JudgmentRepository;

const JUDGMENTS_FILE: &str = "judgments.yaml";
const RESULT_FILE: &str = "result.yaml";

#[derive(Debug, Clone)]
pub struct FileJudgmentRepository {
    base_path: PathBuf,
    // Serializes read-modify-write of judgment files within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileJudgmentRepository {
    /// # Example
    /// ```ignore
    /// let repo = FileJudgmentRepository::new("./data/judgments");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn parent_dir(&self, parent_id: NodeId) -> PathBuf {
        self.base_path.join(parent_id.to_string())
    }

    fn matrix_dir(&self, key: &MatrixKey) -> PathBuf {
        self.parent_dir(key.parent_id)
            .join(key.evaluator_id.to_string())
    }

    async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
        if !fs::try_exists(path)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
        {
            return Ok(None);
        }
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        serde_yaml::from_str(&yaml)
            .map(Some)
            .map_err(|e| {
                DomainError::storage(format!("Failed to parse {}: {}", path.display(), e))
            })
    }

    /// Writes through a temporary file so readers never see a partial file.
    async fn write_yaml<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<(), DomainError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        let yaml = serde_yaml::to_string(value)
            .map_err(|e| DomainError::storage(format!("Failed to serialize: {}", e)))?;

        let target = dir.join(file);
        let tmp = dir.join(format!("{}.tmp", file));
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        fs::rename(&tmp, &target)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))
    }

    async fn remove_if_exists(path: &Path) -> Result<(), DomainError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::storage(e.to_string())),
        }
    }

    async fn load_pairs(&self, key: &MatrixKey) -> Result<Vec<JudgmentRecord>, DomainError> {
        let path = self.matrix_dir(key).join(JUDGMENTS_FILE);
        Ok(Self::read_yaml(&path).await?.unwrap_or_default())
    }
}

#[async_trait]
impl JudgmentRepository for FileJudgmentRepository {
    async fn load_judgments(&self, key: &MatrixKey) -> Result<Vec<JudgmentRecord>, DomainError> {
        self.load_pairs(key).await
    }

    async fn save_judgment(&self, record: JudgmentRecord) -> Result<(), DomainError> {
        let record = canonical_record(record)?;
        let _guard = self.write_lock.lock().await;

        let mut pairs: BTreeMap<(usize, usize), JudgmentRecord> = self
            .load_pairs(&record.matrix)
            .await?
            .into_iter()
            .map(|r| ((r.row, r.col), r))
            .collect();
        pairs.insert((record.row, record.col), record);

        let dir = self.matrix_dir(&record.matrix);
        let records: Vec<_> = pairs.into_values().collect();
        Self::write_yaml(&dir, JUDGMENTS_FILE, &records).await?;
        Self::remove_if_exists(&dir.join(RESULT_FILE)).await
    }

    async fn clear_judgment(
        &self,
        key: &MatrixKey,
        row: usize,
        col: usize,
    ) -> Result<bool, DomainError> {
        let _guard = self.write_lock.lock().await;
        let pair = (row.min(col), row.max(col));

        let mut records = self.load_pairs(key).await?;
        let before = records.len();
        records.retain(|r| (r.row, r.col) != pair);
        if records.len() == before {
            return Ok(false);
        }

        let dir = self.matrix_dir(key);
        Self::write_yaml(&dir, JUDGMENTS_FILE, &records).await?;
        Self::remove_if_exists(&dir.join(RESULT_FILE)).await?;
        Ok(true)
    }

    async fn save_result(&self, result: &PriorityResult) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        Self::write_yaml(&self.matrix_dir(&result.matrix), RESULT_FILE, result).await
    }

    async fn load_result(&self, key: &MatrixKey) -> Result<Option<PriorityResult>, DomainError> {
        Self::read_yaml(&self.matrix_dir(key).join(RESULT_FILE)).await
    }

    async fn list_results(&self, parent_id: NodeId) -> Result<Vec<PriorityResult>, DomainError> {
        let dir = self.parent_dir(parent_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DomainError::storage(e.to_string())),
        };

        let mut results = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
        {
            // Skip anything that is not an evaluator directory.
            let Some(evaluator_id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<EvaluatorId>().ok())
            else {
                continue;
            };
            let key = MatrixKey::new(parent_id, evaluator_id);
            if let Some(result) = self.load_result(&key).await? {
                results.push(result);
            }
        }
        results.sort_by_key(|r: &PriorityResult| r.matrix.evaluator_id);
        Ok(results)
    }
}
