//! Workflow-level status aggregation.

use crate::record::{TaskRecord, TaskStatus, WorkflowRecord, WorkflowStatus};

/// Derive the terminal workflow status from its tasks.
///
/// - every task Completed -> `Completed`
/// - no task Completed -> `Failed`
/// - otherwise -> `Partial`
///
/// Tasks a sequential chain never reached stay Pending and count as not
/// completed. An empty task list aggregates to `Failed`; submission
/// rejects it before it gets here.
pub fn aggregate(tasks: &[TaskRecord]) -> WorkflowStatus {
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();

    if completed == 0 {
        WorkflowStatus::Failed
    } else if completed == tasks.len() {
        WorkflowStatus::Completed
    } else {
        WorkflowStatus::Partial
    }
}

/// Fail every Pending or Running task with `message`.
///
/// Returns the number of tasks that were forced.
pub fn force_fail_unfinished(record: &mut WorkflowRecord, message: &str) -> usize {
    record
        .tasks
        .iter_mut()
        .map(|task| task.force_fail(message))
        .filter(|forced| *forced)
        .count()
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
