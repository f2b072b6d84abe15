//! Workflow store capability and the in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{OrchestraError, Result};
use crate::record::{WorkflowRecord, WorkflowStatus};

/// A mutation applied to one workflow record under exclusive access.
///
/// If the closure returns an error the stored record is left as it was.
pub type Mutation<'a> = Box<dyn FnOnce(&mut WorkflowRecord) -> Result<()> + Send + 'a>;

/// Box a closure as a [`Mutation`].
pub fn mutation<'a, F>(f: F) -> Mutation<'a>
where
    F: FnOnce(&mut WorkflowRecord) -> Result<()> + Send + 'a,
{
    Box::new(f)
}

/// Filter for [`WorkflowStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Only records in this status.
    pub status: Option<WorkflowStatus>,
    /// Maximum number of records, applied after filtering.
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: WorkflowStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for workflow record storage.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Insert a new record. Fails with `DuplicateWorkflow` if the id is taken.
    async fn create(&self, record: WorkflowRecord) -> Result<()>;

    /// Snapshot of a record by id.
    async fn get(&self, workflow_id: &str) -> Result<Option<WorkflowRecord>>;

    /// Records matching `query`, newest `created_at` first.
    async fn list(&self, query: &ListQuery) -> Result<Vec<WorkflowRecord>>;

    /// Apply `mutation` to a record and return the updated snapshot.
    ///
    /// Fails with `WorkflowNotFound` when the id is unknown.
    async fn update(&self, workflow_id: &str, mutation: Mutation<'_>) -> Result<WorkflowRecord>;

    /// Remove a record. Returns whether it existed.
    async fn delete(&self, workflow_id: &str) -> Result<bool>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize>;
}

/// In-memory workflow store.
///
/// Records are sharded across a `DashMap`, so updates to unrelated
/// workflows do not contend on one lock.
pub struct MemoryWorkflowStore {
    workflows: DashMap<String, WorkflowRecord>,
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self {
            workflows: DashMap::new(),
        }
    }
}

impl Default for MemoryWorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn create(&self, record: WorkflowRecord) -> Result<()> {
        match self.workflows.entry(record.workflow_id.clone()) {
            Entry::Occupied(entry) => Err(OrchestraError::DuplicateWorkflow(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, workflow_id: &str) -> Result<Option<WorkflowRecord>> {
        Ok(self.workflows.get(workflow_id).map(|r| r.value().clone()))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<WorkflowRecord>> {
        let mut records: Vec<WorkflowRecord> = self
            .workflows
            .iter()
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .map(|r| r.value().clone())
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn update(&self, workflow_id: &str, mutation: Mutation<'_>) -> Result<WorkflowRecord> {
        let mut entry = self
            .workflows
            .get_mut(workflow_id)
            .ok_or_else(|| OrchestraError::WorkflowNotFound(workflow_id.to_string()))?;

        let mut draft = entry.value().clone();
        mutation(&mut draft)?;
        *entry.value_mut() = draft.clone();
        Ok(draft)
    }

    async fn delete(&self, workflow_id: &str) -> Result<bool> {
        Ok(self.workflows.remove(workflow_id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.workflows.len())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
