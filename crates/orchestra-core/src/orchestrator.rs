//! Submission and query layer over the scheduler and store.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::definition::WorkflowDefinition;
use crate::error::{OrchestraError, Result};
use crate::record::{WorkflowRecord, WorkflowStatus};
use crate::scheduler::Scheduler;
use crate::store::{ListQuery, WorkflowStore};
use crate::validation::validate_definition;

/// Default page size for [`Orchestrator::list_workflows`].
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Accepts workflow submissions and serves status reads.
pub struct Orchestrator {
    scheduler: Scheduler,
    store: Arc<dyn WorkflowStore>,
    tracker: TaskTracker,
}

impl Orchestrator {
    pub fn new(scheduler: Scheduler) -> Self {
        let store = Arc::clone(scheduler.store());
        Self {
            scheduler,
            store,
            tracker: TaskTracker::new(),
        }
    }

    /// Validate and store a workflow, then run it in the background.
    ///
    /// Returns the initial Pending record without waiting for execution.
    pub async fn submit(&self, definition: WorkflowDefinition) -> Result<WorkflowRecord> {
        let (workflow_id, record) = self.prepare(&definition).await?;

        let scheduler = self.scheduler.clone();
        let generation = record.generation;
        self.tracker.spawn(async move {
            match scheduler.run_generation(&workflow_id, generation, &definition).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    debug!(workflow_id = %workflow_id, "Workflow deleted during execution");
                }
                Err(e) => {
                    error!(workflow_id = %workflow_id, error = %e, "Workflow run failed");
                }
            }
        });

        Ok(record)
    }

    /// Validate, store and run a workflow, returning its terminal record.
    pub async fn execute(&self, definition: WorkflowDefinition) -> Result<WorkflowRecord> {
        let (workflow_id, record) = self.prepare(&definition).await?;
        self.scheduler
            .run_generation(&workflow_id, record.generation, &definition)
            .await
    }

    async fn prepare(&self, definition: &WorkflowDefinition) -> Result<(String, WorkflowRecord)> {
        validate_definition(definition)?;

        let workflow_id = definition
            .workflow_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let record = WorkflowRecord::from_definition(workflow_id.clone(), definition);
        self.store.create(record.clone()).await?;

        info!(
            workflow_id = %workflow_id,
            mode = %definition.workflow_type,
            tasks = definition.tasks.len(),
            "Workflow submitted"
        );
        Ok((workflow_id, record))
    }

    /// Current record for a workflow.
    pub async fn get_status(&self, workflow_id: &str) -> Result<WorkflowRecord> {
        self.store
            .get(workflow_id)
            .await?
            .ok_or_else(|| OrchestraError::WorkflowNotFound(workflow_id.to_string()))
    }

    /// Workflows newest first, optionally filtered by status.
    pub async fn list_workflows(
        &self,
        status: Option<WorkflowStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<WorkflowRecord>> {
        let query = ListQuery {
            status,
            limit: Some(limit.unwrap_or(DEFAULT_LIST_LIMIT)),
        };
        self.store.list(&query).await
    }

    /// Remove a workflow record. An in-flight run keeps going.
    pub async fn delete_workflow(&self, workflow_id: &str) -> Result<()> {
        if self.store.delete(workflow_id).await? {
            info!(workflow_id, "Workflow deleted");
            Ok(())
        } else {
            Err(OrchestraError::WorkflowNotFound(workflow_id.to_string()))
        }
    }

    /// Number of stored workflows.
    pub async fn workflow_count(&self) -> Result<usize> {
        self.store.count().await
    }

    /// Number of stored workflows currently Running.
    pub async fn running_count(&self) -> Result<usize> {
        let query = ListQuery::new().with_status(WorkflowStatus::Running);
        Ok(self.store.list(&query).await?.len())
    }

    /// Background runs not yet finished.
    pub fn active_runs(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting background work and wait for in-flight runs.
    pub async fn shutdown(&self) {
        self.tracker.close();
        info!(active = self.tracker.len(), "Waiting for in-flight workflows");
        self.tracker.wait().await;
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
