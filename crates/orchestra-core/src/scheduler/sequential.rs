//! Sequential strategy: one task at a time, in submission order.

use serde_json::Value;
use tracing::info;

use super::{RunKey, Scheduler};
use super::task_runner::TaskOutcome;
use crate::definition::TaskDefinition;
use crate::error::Result;

/// Each task sees the previous task's result as context (`None` after a
/// failure). A failed task halts the chain unless it has the QA role; the
/// remaining tasks are left Pending.
pub(super) async fn run(
    scheduler: &Scheduler,
    key: &RunKey,
    tasks: &[TaskDefinition],
) -> Result<()> {
    let mut previous: Option<Value> = None;

    for (index, task) in tasks.iter().enumerate() {
        let outcome = scheduler
            .run_task(key, index, task, previous.take())
            .await?;

        if let TaskOutcome::Failed(_) = &outcome {
            if !scheduler.is_qa(&task.agent_role) {
                info!(
                    workflow_id = %key.workflow_id,
                    agent_id = %task.agent_id,
                    skipped = tasks.len() - index - 1,
                    "Sequential chain halted"
                );
                break;
            }
        }
        previous = outcome.into_result();
    }

    Ok(())
}
