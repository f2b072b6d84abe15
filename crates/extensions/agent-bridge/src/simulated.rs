//! In-process simulated agents.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::debug;

use orchestra_core::{TaskError, TaskExecutor};

const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Executor that pretends to run each agent.
///
/// Every task sleeps for the configured delay and then reports success,
/// unless its agent id is in the failure set.
pub struct SimulatedExecutor {
    delay: Duration,
    fail_agents: HashSet<String>,
}

impl SimulatedExecutor {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            fail_agents: HashSet::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every task of these agents fail.
    pub fn with_failing_agents<I, S>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fail_agents.extend(agents.into_iter().map(Into::into));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn run(
        &self,
        agent_id: &str,
        agent_role: &str,
        input: &Map<String, Value>,
        context: Option<&Value>,
    ) -> Result<Value, TaskError> {
        debug!(agent_id, agent_role, delay_ms = self.delay.as_millis() as u64, "Simulating agent");
        tokio::time::sleep(self.delay).await;

        if self.fail_agents.contains(agent_id) {
            return Err(TaskError::agent(format!(
                "simulated failure for agent '{}'",
                agent_id
            )));
        }

        Ok(json!({
            "agent_id": agent_id,
            "agent_role": agent_role,
            "input": input,
            "context": context,
            "output": {
                "success": true,
                "message": format!("{} agent completed successfully", agent_role),
                "timestamp": Utc::now().to_rfc3339(),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use orchestra_core::{
        ExecutionMode, MemoryWorkflowStore, Orchestrator, Scheduler, TaskDefinition,
        WorkflowDefinition, WorkflowStatus,
    };

    #[tokio::test]
    async fn test_result_shape() {
        let executor = SimulatedExecutor::new().with_delay(Duration::ZERO);
        let mut input = Map::new();
        input.insert("feature".into(), json!("login"));

        let result = executor
            .run("fe-1", "frontend", &input, Some(&json!({"design": "v2"})))
            .await
            .unwrap();

        assert_eq!(result["agent_id"], "fe-1");
        assert_eq!(result["agent_role"], "frontend");
        assert_eq!(result["input"]["feature"], "login");
        assert_eq!(result["context"]["design"], "v2");
        assert_eq!(result["output"]["success"], true);
        assert_eq!(
            result["output"]["message"],
            "frontend agent completed successfully"
        );
        assert!(result["output"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_null_context() {
        let executor = SimulatedExecutor::new().with_delay(Duration::ZERO);
        let result = executor.run("be-1", "backend", &Map::new(), None).await.unwrap();
        assert!(result["context"].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay_is_one_second() {
        let executor = SimulatedExecutor::new();
        assert_eq!(executor.delay(), Duration::from_secs(1));

        let started = tokio::time::Instant::now();
        executor.run("a", "qa", &Map::new(), None).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let executor = SimulatedExecutor::new()
            .with_delay(Duration::ZERO)
            .with_failing_agents(["flaky"]);
        let err = executor.run("flaky", "backend", &Map::new(), None).await.unwrap_err();
        assert!(err.to_string().contains("flaky"));
        assert!(executor.run("steady", "backend", &Map::new(), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_drives_graph_workflow() {
        let executor = SimulatedExecutor::new().with_delay(Duration::from_millis(5));
        let scheduler = Scheduler::new(Arc::new(MemoryWorkflowStore::new()), Arc::new(executor));
        let orchestrator = Orchestrator::new(scheduler);

        let def = WorkflowDefinition::new(
            ExecutionMode::Graph,
            vec![
                TaskDefinition::new("coord", "coordinator"),
                TaskDefinition::new("api", "backend").depends_on(["coord"]),
            ],
        );
        let record = orchestrator.execute(def).await.unwrap();

        assert_eq!(record.status, WorkflowStatus::Completed);
        let api = record.tasks[1].result.as_ref().unwrap();
        assert_eq!(api["context"]["coord"]["agent_role"], "coordinator");
    }
}
