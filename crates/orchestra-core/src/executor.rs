//! The task executor capability.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TaskError;

/// Runs one agent task.
///
/// Called concurrently from many tasks in parallel and graph mode, so
/// implementations must be safe to share.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Execute a task.
    ///
    /// `context` is the previous task's result in sequential mode, the map of
    /// `{dependency_agent_id: result}` in graph mode, and `None` otherwise.
    async fn run(
        &self,
        agent_id: &str,
        agent_role: &str,
        input: &Map<String, Value>,
        context: Option<&Value>,
    ) -> Result<Value, TaskError>;
}
