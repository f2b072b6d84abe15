//! Workflow scheduler.
//!
//! Drives one workflow through its execution strategy, mutating the store as
//! tasks progress, then aggregates the terminal workflow status. Task faults
//! are absorbed by the single-task wrapper; anything that escapes a strategy
//! is an orchestration fault and force-fails every unfinished task.

mod graph;
mod parallel;
mod sequential;
mod task_runner;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::definition::{ExecutionMode, WorkflowDefinition};
use crate::error::{OrchestraError, Result};
use crate::executor::TaskExecutor;
use crate::record::WorkflowRecord;
use crate::status::{aggregate, force_fail_unfinished};
use crate::store::{mutation, Mutation, WorkflowStore};
use crate::validation::validate_tasks;

/// What a graph dependent does when one of its dependencies failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyFailurePolicy {
    /// Run anyway; the failed dependency has no entry in the context map.
    #[default]
    Proceed,
    /// Fail without calling the executor.
    FailDependents,
}

/// Scheduler tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerOptions {
    /// Role whose failures do not halt a sequential chain.
    pub qa_role: String,
    /// Upper bound on tasks running at once across all workflows.
    pub max_concurrent_tasks: Option<usize>,
    /// Graph-mode handling of failed dependencies.
    pub dependency_failure: DependencyFailurePolicy,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            qa_role: "qa".to_string(),
            max_concurrent_tasks: None,
            dependency_failure: DependencyFailurePolicy::default(),
        }
    }
}

/// Identifies one run of one stored record.
///
/// Every write made by the run checks the generation, so a run whose record
/// was deleted and recreated under the same id sees it as gone.
#[derive(Debug, Clone)]
pub(crate) struct RunKey {
    pub(crate) workflow_id: String,
    pub(crate) generation: Uuid,
}

impl RunKey {
    fn guard<'a>(&'a self, inner: Mutation<'a>) -> Mutation<'a> {
        mutation(move |record| {
            if record.generation != self.generation {
                return Err(OrchestraError::WorkflowNotFound(self.workflow_id.clone()));
            }
            inner(record)
        })
    }
}

/// Executes workflows against a store and a task executor.
#[derive(Clone)]
pub struct Scheduler {
    store: Arc<dyn WorkflowStore>,
    executor: Arc<dyn TaskExecutor>,
    options: Arc<SchedulerOptions>,
    permits: Option<Arc<Semaphore>>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn WorkflowStore>, executor: Arc<dyn TaskExecutor>) -> Self {
        Self::with_options(store, executor, SchedulerOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn WorkflowStore>,
        executor: Arc<dyn TaskExecutor>,
        options: SchedulerOptions,
    ) -> Self {
        let permits = options
            .max_concurrent_tasks
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        Self {
            store,
            executor,
            options: Arc::new(options),
            permits,
        }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<dyn WorkflowStore> {
        &self.store
    }

    /// Run a stored Pending workflow to its terminal state.
    ///
    /// Returns the terminal record. Fails only if the workflow could not be
    /// started or finished in the store; task and strategy faults end up in
    /// the record instead.
    pub async fn run(
        &self,
        workflow_id: &str,
        definition: &WorkflowDefinition,
    ) -> Result<WorkflowRecord> {
        self.start(workflow_id, None, definition).await
    }

    /// Like [`Scheduler::run`], but only for the record created with
    /// `generation`. A record of another generation counts as not found.
    pub async fn run_generation(
        &self,
        workflow_id: &str,
        generation: Uuid,
        definition: &WorkflowDefinition,
    ) -> Result<WorkflowRecord> {
        self.start(workflow_id, Some(generation), definition).await
    }

    async fn start(
        &self,
        workflow_id: &str,
        expected: Option<Uuid>,
        definition: &WorkflowDefinition,
    ) -> Result<WorkflowRecord> {
        let started = self
            .store
            .update(
                workflow_id,
                mutation(|record| {
                    if expected.is_some_and(|g| g != record.generation) {
                        return Err(OrchestraError::WorkflowNotFound(workflow_id.to_string()));
                    }
                    record.begin()
                }),
            )
            .await?;
        let key = RunKey {
            workflow_id: workflow_id.to_string(),
            generation: started.generation,
        };
        info!(
            workflow_id,
            mode = %definition.workflow_type,
            tasks = definition.tasks.len(),
            "Workflow started"
        );

        let outcome = AssertUnwindSafe(self.drive(&key, definition))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(OrchestraError::Orchestration(format!(
                    "strategy panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });

        if let Err(fault) = outcome {
            error!(workflow_id, error = %fault, "Workflow execution fault");
            let message = fault.to_string();
            self.write(
                &key,
                mutation(move |record| {
                    let forced = force_fail_unfinished(record, &message);
                    debug!(workflow_id = %record.workflow_id, forced, "Forced unfinished tasks to failed");
                    Ok(())
                }),
            )
            .await?;
        }

        let record = self
            .store
            .update(
                workflow_id,
                key.guard(mutation(|record| {
                    let status = aggregate(&record.tasks);
                    record.finish(status)
                })),
            )
            .await
            .inspect_err(|e| {
                if e.is_not_found() {
                    debug!(workflow_id, "Workflow deleted before it finished");
                }
            })?;

        info!(
            workflow_id,
            status = %record.status,
            completed = record.count(crate::record::TaskStatus::Completed),
            failed = record.count(crate::record::TaskStatus::Failed),
            "Workflow finished"
        );
        Ok(record)
    }

    async fn drive(&self, key: &RunKey, definition: &WorkflowDefinition) -> Result<()> {
        let tasks = &definition.tasks;
        match definition.workflow_type {
            ExecutionMode::Sequential => sequential::run(self, key, tasks).await,
            ExecutionMode::Parallel => parallel::run(self, key, tasks).await,
            ExecutionMode::Graph => {
                validate_tasks(ExecutionMode::Graph, tasks)?;
                graph::run(self, key, tasks).await
            }
        }
    }

    /// Apply a mutation for this run, tolerating a record deleted or
    /// replaced mid-run.
    pub(crate) async fn write(&self, key: &RunKey, mutation: Mutation<'_>) -> Result<()> {
        match self.store.update(&key.workflow_id, key.guard(mutation)).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(workflow_id = %key.workflow_id, "Workflow record gone, dropping update");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) fn is_qa(&self, role: &str) -> bool {
        role.eq_ignore_ascii_case(&self.options.qa_role)
    }
}

/// Wait for every spawned task, then report the first fault, if any.
pub(crate) async fn join_spawned(handles: Vec<JoinHandle<Result<()>>>) -> Result<()> {
    let mut first_fault = None;
    for joined in join_all(handles).await {
        let result = joined.unwrap_or_else(|e| {
            Err(OrchestraError::Orchestration(format!("task join failed: {}", e)))
        });
        if let Err(e) = result {
            first_fault.get_or_insert(e);
        }
    }
    match first_fault {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
