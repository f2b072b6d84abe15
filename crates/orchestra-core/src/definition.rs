//! Workflow definitions supplied by callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the tasks of a workflow are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One task after another, each seeing the previous result.
    Sequential,
    /// All tasks at once, no shared context.
    Parallel,
    /// Tasks wait on their declared dependencies.
    Graph,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Graph => "graph",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single agent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Agent that executes the task.
    pub agent_id: String,
    /// Agent role (frontend, backend, qa, debugger, coordinator, ...).
    pub agent_role: String,
    /// Opaque input payload handed to the agent.
    #[serde(default)]
    pub input_data: Map<String, Value>,
    /// Agent ids this task waits on in graph mode.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl TaskDefinition {
    /// Create a task with no input and no dependencies.
    pub fn new(agent_id: impl Into<String>, agent_role: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_role: agent_role.into(),
            input_data: Map::new(),
            depends_on: Vec::new(),
        }
    }

    /// Add an input field.
    pub fn with_input(mut self, key: impl Into<String>, value: Value) -> Self {
        self.input_data.insert(key.into(), value);
        self
    }

    /// Declare dependencies by agent id.
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A workflow submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Caller-supplied id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// Execution pattern.
    pub workflow_type: ExecutionMode,
    /// Tasks in submission order.
    pub tasks: Vec<TaskDefinition>,
    /// Additional metadata, stored verbatim.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl WorkflowDefinition {
    /// Create a definition with a generated id.
    pub fn new(mode: ExecutionMode, tasks: Vec<TaskDefinition>) -> Self {
        Self {
            workflow_id: None,
            workflow_type: mode,
            tasks,
            metadata: Map::new(),
        }
    }

    /// Set the workflow id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.workflow_id = Some(id.into());
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
