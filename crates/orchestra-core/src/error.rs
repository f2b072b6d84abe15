//! Orchestra core error types.

use thiserror::Error;

/// Errors raised by the scheduler, the store and the submission layer.
#[derive(Debug, Error)]
pub enum OrchestraError {
    /// Workflow id unknown to the store.
    #[error("Workflow {0} not found")]
    WorkflowNotFound(String),

    /// A workflow with this id already exists.
    #[error("Workflow {0} already exists")]
    DuplicateWorkflow(String),

    /// Workflow definition rejected at submission.
    #[error("Invalid workflow definition: {0}")]
    InvalidWorkflow(String),

    /// A status change the lifecycle does not allow.
    #[error("Invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: &'static str,
        to: &'static str,
    },

    /// Backing store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Fault in the scheduling logic itself, not attributable to one task.
    #[error("Orchestration fault: {0}")]
    Orchestration(String),
}

impl OrchestraError {
    /// Whether this error means the workflow record is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OrchestraError::WorkflowNotFound(_))
    }
}

/// Failure reported by a [`TaskExecutor`](crate::executor::TaskExecutor) for one task.
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    /// The agent ran and reported failure.
    #[error("{0}")]
    Agent(String),

    /// The agent could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The agent answered with something that is not a result.
    #[error("Invalid agent response: {0}")]
    InvalidResponse(String),

    /// The executor panicked while running the task.
    #[error("Executor panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    /// Shorthand for an agent-reported failure.
    pub fn agent(message: impl Into<String>) -> Self {
        TaskError::Agent(message.into())
    }
}

pub type Result<T> = std::result::Result<T, OrchestraError>;
