//! Parallel strategy: every task at once, full join.

use super::{RunKey, Scheduler, join_spawned};
use crate::definition::TaskDefinition;
use crate::error::Result;

/// Spawn every task with no context and wait for all of them. A failing
/// task does not affect its siblings.
pub(super) async fn run(
    scheduler: &Scheduler,
    key: &RunKey,
    tasks: &[TaskDefinition],
) -> Result<()> {
    let handles = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let scheduler = scheduler.clone();
            let key = key.clone();
            let task = task.clone();
            tokio::spawn(async move {
                scheduler
                    .run_task(&key, index, &task, None)
                    .await
                    .map(|_| ())
            })
        })
        .collect();

    join_spawned(handles).await
}
