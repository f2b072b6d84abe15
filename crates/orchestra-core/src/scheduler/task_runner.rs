//! Single-task execution wrapper.
//!
//! The only place task status, timestamps, result and error are written
//! during a run. Executor failures and panics become a Failed task here and
//! never reach the strategy.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, warn};

use super::{RunKey, Scheduler, panic_message};
use crate::definition::TaskDefinition;
use crate::error::{OrchestraError, Result, TaskError};
use crate::store::mutation;

/// How a task ended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TaskOutcome {
    Completed(Value),
    Failed(String),
}

impl TaskOutcome {
    pub(crate) fn into_result(self) -> Option<Value> {
        match self {
            TaskOutcome::Completed(value) => Some(value),
            TaskOutcome::Failed(_) => None,
        }
    }
}

impl Scheduler {
    /// Run the task at `index`: Pending -> Running -> Completed | Failed.
    ///
    /// An `Err` is an orchestration fault (store failure, illegal
    /// transition), not a task failure.
    pub(crate) async fn run_task(
        &self,
        key: &RunKey,
        index: usize,
        task: &TaskDefinition,
        context: Option<Value>,
    ) -> Result<TaskOutcome> {
        let _permit = match &self.permits {
            Some(permits) => Some(permits.acquire().await.map_err(|e| {
                OrchestraError::Orchestration(format!("task permits unavailable: {}", e))
            })?),
            None => None,
        };

        self.write(key, mutation(move |r| r.task_mut(index)?.start()))
            .await?;
        debug!(workflow_id = %key.workflow_id, agent_id = %task.agent_id, index, "Task running");

        let call = self.executor.run(
            &task.agent_id,
            &task.agent_role,
            &task.input_data,
            context.as_ref(),
        );
        let outcome = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(result)) => TaskOutcome::Completed(result),
            Ok(Err(e)) => TaskOutcome::Failed(e.to_string()),
            Err(panic) => {
                TaskOutcome::Failed(TaskError::Panicked(panic_message(panic.as_ref())).to_string())
            }
        };

        self.record_outcome(key, index, task, &outcome).await?;
        Ok(outcome)
    }

    /// Fail the task at `index` without calling the executor. It still
    /// passes through Running.
    pub(crate) async fn fail_task(
        &self,
        key: &RunKey,
        index: usize,
        task: &TaskDefinition,
        reason: String,
    ) -> Result<TaskOutcome> {
        self.write(key, mutation(move |r| r.task_mut(index)?.start()))
            .await?;
        let outcome = TaskOutcome::Failed(reason);
        self.record_outcome(key, index, task, &outcome).await?;
        Ok(outcome)
    }

    async fn record_outcome(
        &self,
        key: &RunKey,
        index: usize,
        task: &TaskDefinition,
        outcome: &TaskOutcome,
    ) -> Result<()> {
        match outcome {
            TaskOutcome::Completed(result) => {
                let result = result.clone();
                self.write(
                    key,
                    mutation(move |r| r.task_mut(index)?.complete(result)),
                )
                .await?;
                debug!(workflow_id = %key.workflow_id, agent_id = %task.agent_id, index, "Task completed");
            }
            TaskOutcome::Failed(error) => {
                warn!(workflow_id = %key.workflow_id, agent_id = %task.agent_id, index, error = %error, "Task failed");
                let error = error.clone();
                self.write(
                    key,
                    mutation(move |r| r.task_mut(index)?.fail(error)),
                )
                .await?;
            }
        }
        Ok(())
    }
}
