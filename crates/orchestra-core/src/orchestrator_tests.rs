//! Tests for the orchestrator.

use std::time::Duration;

use super::*;
use crate::definition::{ExecutionMode, TaskDefinition};
use crate::mock_executor::MockTaskExecutor;
use crate::record::TaskStatus;
use crate::store::MemoryWorkflowStore;

fn orchestrator(executor: MockTaskExecutor) -> Orchestrator {
    let scheduler = Scheduler::new(Arc::new(MemoryWorkflowStore::new()), Arc::new(executor));
    Orchestrator::new(scheduler)
}

fn two_step(id: Option<&str>) -> WorkflowDefinition {
    let def = WorkflowDefinition::new(
        ExecutionMode::Sequential,
        vec![
            TaskDefinition::new("backend-1", "backend"),
            TaskDefinition::new("qa-1", "qa"),
        ],
    );
    match id {
        Some(id) => def.with_id(id),
        None => def,
    }
}

#[tokio::test]
async fn test_submit_returns_pending_and_runs_in_background() {
    let orch = orchestrator(MockTaskExecutor::new().with_default_delay(Duration::from_millis(20)));

    let record = orch.submit(two_step(Some("wf-1"))).await.unwrap();
    assert_eq!(record.workflow_id, "wf-1");
    assert_eq!(record.status, WorkflowStatus::Pending);
    assert_eq!(record.tasks[0].task_id, "wf-1-task-0");
    assert_eq!(record.tasks[1].task_id, "wf-1-task-1");
    assert!(record.tasks.iter().all(|t| t.status == TaskStatus::Pending));

    orch.shutdown().await;
    assert_eq!(orch.active_runs(), 0);

    let done = orch.get_status("wf-1").await.unwrap();
    assert_eq!(done.status, WorkflowStatus::Completed);
    assert!(done.started_at.is_some());
    assert!(done.completed_at.is_some());
}

#[tokio::test]
async fn test_submit_generates_uuid() {
    let orch = orchestrator(MockTaskExecutor::new());
    let record = orch.submit(two_step(None)).await.unwrap();
    assert!(Uuid::parse_str(&record.workflow_id).is_ok());
    orch.shutdown().await;
}

#[tokio::test]
async fn test_submit_rejects_invalid_and_duplicate() {
    let orch = orchestrator(MockTaskExecutor::new());

    let empty = WorkflowDefinition::new(ExecutionMode::Parallel, vec![]);
    let err = orch.submit(empty).await.unwrap_err();
    assert!(matches!(err, OrchestraError::InvalidWorkflow(_)));
    assert_eq!(orch.workflow_count().await.unwrap(), 0);

    orch.submit(two_step(Some("dup"))).await.unwrap();
    let err = orch.submit(two_step(Some("dup"))).await.unwrap_err();
    assert!(matches!(err, OrchestraError::DuplicateWorkflow(_)));
    orch.shutdown().await;
}

#[tokio::test]
async fn test_execute_waits_for_terminal_record() {
    let orch = orchestrator(MockTaskExecutor::new().with_failure("backend-1", "boom"));
    let record = orch.execute(two_step(Some("wf-x"))).await.unwrap();
    assert_eq!(record.status, WorkflowStatus::Failed);
    assert_eq!(record.tasks[1].status, TaskStatus::Pending);
    assert_eq!(orch.get_status("wf-x").await.unwrap(), record);
}

#[tokio::test]
async fn test_status_visible_while_running() {
    let orch = orchestrator(MockTaskExecutor::new().with_default_delay(Duration::from_millis(100)));
    orch.submit(two_step(Some("slow"))).await.unwrap();

    tokio::time::sleep(Duration::from_millis(30)).await;
    let record = orch.get_status("slow").await.unwrap();
    assert_eq!(record.status, WorkflowStatus::Running);
    assert_eq!(record.tasks[0].status, TaskStatus::Running);
    assert_eq!(orch.running_count().await.unwrap(), 1);
    assert_eq!(orch.active_runs(), 1);

    orch.shutdown().await;
    assert_eq!(orch.running_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_status_twice_is_identical() {
    let orch = orchestrator(MockTaskExecutor::new());
    orch.execute(two_step(Some("wf-1"))).await.unwrap();
    let first = orch.get_status("wf-1").await.unwrap();
    let second = orch.get_status("wf-1").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_respects_filter_and_limit() {
    let orch = orchestrator(MockTaskExecutor::new().with_failure("backend-1", "boom"));
    for i in 0..3 {
        orch.execute(two_step(Some(&format!("failed-{}", i)))).await.unwrap();
    }
    let ok = WorkflowDefinition::new(
        ExecutionMode::Parallel,
        vec![TaskDefinition::new("qa-1", "qa")],
    )
    .with_id("ok");
    orch.execute(ok).await.unwrap();

    let all = orch.list_workflows(None, None).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let failed = orch
        .list_workflows(Some(WorkflowStatus::Failed), None)
        .await
        .unwrap();
    assert_eq!(failed.len(), 3);
    assert!(failed.iter().all(|r| r.status == WorkflowStatus::Failed));

    let limited = orch
        .list_workflows(Some(WorkflowStatus::Failed), Some(2))
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let completed = orch
        .list_workflows(Some(WorkflowStatus::Completed), None)
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].workflow_id, "ok");
}

#[tokio::test]
async fn test_delete_workflow() {
    let orch = orchestrator(MockTaskExecutor::new());
    orch.execute(two_step(Some("wf-1"))).await.unwrap();

    orch.delete_workflow("wf-1").await.unwrap();
    assert!(orch.get_status("wf-1").await.unwrap_err().is_not_found());
    assert!(orch.delete_workflow("wf-1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_during_run_is_tolerated() {
    let orch = orchestrator(MockTaskExecutor::new().with_default_delay(Duration::from_millis(50)));
    orch.submit(two_step(Some("wf-1"))).await.unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    orch.delete_workflow("wf-1").await.unwrap();

    orch.shutdown().await;
    assert_eq!(orch.workflow_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_resubmitted_id_is_isolated_from_stale_run() {
    let executor = MockTaskExecutor::new()
        .with_delay("old-a", Duration::from_millis(80))
        .with_delay("old-b", Duration::from_millis(80))
        .with_delay("new-x", Duration::from_millis(200));
    let orch = orchestrator(executor);

    let old = WorkflowDefinition::new(
        ExecutionMode::Parallel,
        vec![
            TaskDefinition::new("old-a", "backend"),
            TaskDefinition::new("old-b", "backend"),
        ],
    )
    .with_id("wf-1");
    orch.submit(old).await.unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    orch.delete_workflow("wf-1").await.unwrap();

    let new = WorkflowDefinition::new(
        ExecutionMode::Sequential,
        vec![TaskDefinition::new("new-x", "frontend")],
    )
    .with_id("wf-1");
    orch.submit(new).await.unwrap();

    // The old run's tasks have finished by now; none of their writes may land.
    tokio::time::sleep(Duration::from_millis(120)).await;
    let during = orch.get_status("wf-1").await.unwrap();
    assert_eq!(during.status, WorkflowStatus::Running);
    assert_eq!(during.tasks.len(), 1);
    assert_eq!(during.tasks[0].agent_id, "new-x");
    assert_eq!(during.tasks[0].status, TaskStatus::Running);
    assert!(during.tasks[0].result.is_none());
    assert!(during.tasks[0].error.is_none());

    orch.shutdown().await;
    let done = orch.get_status("wf-1").await.unwrap();
    assert_eq!(done.status, WorkflowStatus::Completed);
    assert_eq!(done.tasks[0].result.as_ref().unwrap()["agent_id"], "new-x");
}
