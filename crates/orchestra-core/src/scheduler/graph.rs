//! Dependency-graph strategy.
//!
//! Every task is spawned up front and parks on the completion signals of its
//! dependencies. A task fires its own signal once its record is terminal,
//! whether it completed, failed or hit a fault, so dependents never wait on a
//! signal that cannot fire.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::task_runner::TaskOutcome;
use super::{DependencyFailurePolicy, RunKey, Scheduler, join_spawned};
use crate::definition::TaskDefinition;
use crate::error::{OrchestraError, Result};
use crate::signal::SignalBoard;

/// Agent id -> result; `None` when the task did not complete.
type Results = Arc<DashMap<String, Option<Value>>>;

pub(super) async fn run(
    scheduler: &Scheduler,
    key: &RunKey,
    tasks: &[TaskDefinition],
) -> Result<()> {
    let board = Arc::new(SignalBoard::for_tasks(tasks));
    let results: Results = Arc::new(DashMap::new());

    let handles = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let scheduler = scheduler.clone();
            let key = key.clone();
            let task = task.clone();
            let board = Arc::clone(&board);
            let results = Arc::clone(&results);
            tokio::spawn(async move {
                run_node(&scheduler, &key, index, &task, &board, &results).await
            })
        })
        .collect();

    join_spawned(handles).await
}

async fn run_node(
    scheduler: &Scheduler,
    key: &RunKey,
    index: usize,
    task: &TaskDefinition,
    board: &SignalBoard,
    results: &Results,
) -> Result<()> {
    let signal = board.get(&task.agent_id).ok_or_else(|| {
        OrchestraError::Orchestration(format!("no completion signal for agent '{}'", task.agent_id))
    })?;
    let _fire = signal.fire_on_drop();

    if !task.depends_on.is_empty() {
        debug!(workflow_id = %key.workflow_id, agent_id = %task.agent_id, deps = ?task.depends_on, "Waiting on dependencies");
        board.wait_all(&task.depends_on).await?;
    }

    let failed_dep = task
        .depends_on
        .iter()
        .find(|dep| !matches!(results.get(dep.as_str()).as_deref(), Some(Some(_))));

    let outcome = match (scheduler.options.dependency_failure, failed_dep) {
        (DependencyFailurePolicy::FailDependents, Some(dep)) => {
            let reason = format!("upstream dependency '{}' failed", dep);
            scheduler.fail_task(key, index, task, reason).await?
        }
        _ => {
            let context = dependency_context(task, results);
            scheduler.run_task(key, index, task, context).await?
        }
    };

    results.insert(task.agent_id.clone(), outcome.into_result());
    Ok(())
}

/// `{dependency_agent_id: result}` for the dependencies that completed, or
/// `None` for a task with no dependencies.
fn dependency_context(task: &TaskDefinition, results: &Results) -> Option<Value> {
    if task.depends_on.is_empty() {
        return None;
    }

    let context: Map<String, Value> = task
        .depends_on
        .iter()
        .filter_map(|dep| {
            let entry = results.get(dep.as_str())?;
            let value = entry.value().clone()?;
            Some((dep.clone(), value))
        })
        .collect();
    Some(Value::Object(context))
}
