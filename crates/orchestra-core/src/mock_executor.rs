//! Mock task executor for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use crate::error::TaskError;
use crate::executor::TaskExecutor;

#[derive(Debug, Clone)]
enum Script {
    Respond(Value),
    Fail(String),
    Panic(String),
}

/// One recorded executor invocation.
#[derive(Debug, Clone)]
pub struct ExecutorCall {
    pub agent_id: String,
    pub agent_role: String,
    pub context: Option<Value>,
    pub started: Instant,
    pub finished: Instant,
}

/// Mock executor with per-agent scripted outcomes and delays.
///
/// Agents without a script succeed with an echo of their invocation.
pub struct MockTaskExecutor {
    scripts: HashMap<String, Script>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: Mutex<Vec<ExecutorCall>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockTaskExecutor {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Return `response` for `agent`.
    pub fn with_response(mut self, agent: &str, response: Value) -> Self {
        self.scripts.insert(agent.to_string(), Script::Respond(response));
        self
    }

    /// Fail `agent` with `message`.
    pub fn with_failure(mut self, agent: &str, message: &str) -> Self {
        self.scripts
            .insert(agent.to_string(), Script::Fail(message.to_string()));
        self
    }

    /// Panic inside the executor when `agent` runs.
    pub fn with_panic(mut self, agent: &str, message: &str) -> Self {
        self.scripts
            .insert(agent.to_string(), Script::Panic(message.to_string()));
        self
    }

    /// Delay `agent` before it answers.
    pub fn with_delay(mut self, agent: &str, delay: Duration) -> Self {
        self.delays.insert(agent.to_string(), delay);
        self
    }

    /// Delay applied to agents without their own delay.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// All recorded calls, in completion order.
    pub async fn calls(&self) -> Vec<ExecutorCall> {
        self.calls.lock().await.clone()
    }

    /// The recorded call for `agent`, if it ran.
    pub async fn call(&self, agent: &str) -> Option<ExecutorCall> {
        self.calls
            .lock()
            .await
            .iter()
            .find(|c| c.agent_id == agent)
            .cloned()
    }

    /// Highest number of simultaneous invocations observed.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Default for MockTaskExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskExecutor for MockTaskExecutor {
    async fn run(
        &self,
        agent_id: &str,
        agent_role: &str,
        input: &Map<String, Value>,
        context: Option<&Value>,
    ) -> Result<Value, TaskError> {
        let started = Instant::now();
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        let delay = self
            .delays
            .get(agent_id)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().await.push(ExecutorCall {
            agent_id: agent_id.to_string(),
            agent_role: agent_role.to_string(),
            context: context.cloned(),
            started,
            finished: Instant::now(),
        });

        match self.scripts.get(agent_id) {
            Some(Script::Respond(value)) => Ok(value.clone()),
            Some(Script::Fail(message)) => Err(TaskError::agent(message.clone())),
            Some(Script::Panic(message)) => panic!("{}", message),
            None => Ok(json!({
                "agent_id": agent_id,
                "agent_role": agent_role,
                "input": input,
                "context": context,
            })),
        }
    }
}
