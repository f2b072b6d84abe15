//! Mutable workflow and task records tracked by the store.
//!
//! Task lifecycle: `Pending -> Running -> {Completed, Failed}`. Workflow
//! lifecycle: `Pending -> Running -> {Completed, Failed, Partial}`. Terminal
//! states are final; the transition methods refuse anything else and leave
//! the record untouched.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::definition::{ExecutionMode, TaskDefinition, WorkflowDefinition};
use crate::error::{OrchestraError, Result};

/// Status of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Handed to the executor.
    Running,
    /// Executor returned a result.
    Completed,
    /// Executor failed, or the run was aborted.
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Aggregate status of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Pending,
    Running,
    /// Every task completed.
    Completed,
    /// No task completed.
    Failed,
    /// Some tasks completed, some failed.
    Partial,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Running => "running",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Partial => "partial",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Partial
        )
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(WorkflowStatus::Pending),
            "running" => Ok(WorkflowStatus::Running),
            "completed" => Ok(WorkflowStatus::Completed),
            "failed" => Ok(WorkflowStatus::Failed),
            "partial" => Ok(WorkflowStatus::Partial),
            other => Err(format!("unknown workflow status '{}'", other)),
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic task id: `{workflow_id}-task-{ordinal}`.
pub fn task_id_for(workflow_id: &str, ordinal: usize) -> String {
    format!("{}-task-{}", workflow_id, ordinal)
}

/// Status of one task within a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub agent_id: String,
    pub agent_role: String,
    pub status: TaskStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Set only when completed.
    pub result: Option<Value>,
    /// Set only when failed.
    pub error: Option<String>,
}

impl TaskRecord {
    /// Create a pending record for a task definition.
    pub fn pending(task_id: impl Into<String>, definition: &TaskDefinition) -> Self {
        Self {
            task_id: task_id.into(),
            agent_id: definition.agent_id.clone(),
            agent_role: definition.agent_role.clone(),
            status: TaskStatus::Pending,
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    /// Pending -> Running.
    pub fn start(&mut self) -> Result<()> {
        self.expect(TaskStatus::Pending, TaskStatus::Running)?;
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Running -> Completed.
    pub fn complete(&mut self, result: Value) -> Result<()> {
        self.expect(TaskStatus::Running, TaskStatus::Completed)?;
        self.status = TaskStatus::Completed;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Running -> Failed.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<()> {
        self.expect(TaskStatus::Running, TaskStatus::Failed)?;
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Abort path for orchestration faults: any non-terminal task becomes
    /// Failed, including Pending ones. Returns whether the record changed.
    pub fn force_fail(&mut self, error: &str) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error.to_string());
        self.completed_at = Some(Utc::now());
        true
    }

    fn expect(&self, from: TaskStatus, to: TaskStatus) -> Result<()> {
        if self.status == from {
            Ok(())
        } else {
            Err(OrchestraError::InvalidTransition {
                id: self.task_id.clone(),
                from: self.status.as_str(),
                to: to.as_str(),
            })
        }
    }
}

/// Status of a whole workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub workflow_id: String,
    pub workflow_type: ExecutionMode,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Tasks in submission order.
    pub tasks: Vec<TaskRecord>,
    pub metadata: Map<String, Value>,
    /// Distinguishes this record from a later one created under the same id.
    #[serde(skip)]
    pub generation: Uuid,
}

impl WorkflowRecord {
    /// Build the initial pending record for a submission.
    pub fn from_definition(workflow_id: impl Into<String>, definition: &WorkflowDefinition) -> Self {
        let workflow_id = workflow_id.into();
        let tasks = definition
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| TaskRecord::pending(task_id_for(&workflow_id, i), task))
            .collect();

        Self {
            workflow_id,
            workflow_type: definition.workflow_type,
            status: WorkflowStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            tasks,
            metadata: definition.metadata.clone(),
            generation: Uuid::new_v4(),
        }
    }

    /// Pending -> Running.
    pub fn begin(&mut self) -> Result<()> {
        if self.status != WorkflowStatus::Pending {
            return Err(self.transition_error(WorkflowStatus::Running));
        }
        self.status = WorkflowStatus::Running;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Running -> terminal.
    pub fn finish(&mut self, status: WorkflowStatus) -> Result<()> {
        if self.status != WorkflowStatus::Running || !status.is_terminal() {
            return Err(self.transition_error(status));
        }
        self.status = status;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Mutable access to the task at `index`.
    pub fn task_mut(&mut self, index: usize) -> Result<&mut TaskRecord> {
        let workflow_id = &self.workflow_id;
        let len = self.tasks.len();
        self.tasks.get_mut(index).ok_or_else(|| {
            OrchestraError::Orchestration(format!(
                "task index {} out of range for workflow {} ({} tasks)",
                index, workflow_id, len
            ))
        })
    }

    /// Number of tasks currently in `status`.
    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    fn transition_error(&self, to: WorkflowStatus) -> OrchestraError {
        OrchestraError::InvalidTransition {
            id: self.workflow_id.clone(),
            from: self.status.as_str(),
            to: to.as_str(),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
