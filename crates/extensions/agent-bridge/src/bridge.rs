//! HTTP bridge to an external agent service.
//!
//! Each task is a `POST {base_url}/agents/{agent_id}/run` with a JSON body;
//! the JSON response body is the task result.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use orchestra_core::{TaskError, TaskExecutor};

use crate::roles::system_prompt_for;

/// Errors building a bridge executor.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Invalid bridge URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Bridge connection settings and the model parameters sent with every task.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub model: String,
    pub temperature: f64,
}

impl BridgeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(300),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    agent_id: &'a str,
    agent_role: &'a str,
    system_prompt: &'a str,
    model: &'a str,
    temperature: f64,
    input: &'a Map<String, Value>,
    context: Option<&'a Value>,
}

/// Executor that delegates each task to a remote agent service.
pub struct HttpBridgeExecutor {
    base_url: Url,
    api_token: Option<String>,
    model: String,
    temperature: f64,
    client: reqwest::Client,
}

impl HttpBridgeExecutor {
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let invalid = |message: String| BridgeError::InvalidUrl {
            url: config.base_url.clone(),
            message,
        };
        let base_url = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_string()));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url,
            api_token: config.api_token,
            model: config.model,
            temperature: config.temperature,
            client,
        })
    }

    fn run_url(&self, agent_id: &str) -> Result<Url, TaskError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TaskError::Transport(format!("cannot extend bridge URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["agents", agent_id, "run"]);
        Ok(url)
    }
}

#[async_trait]
impl TaskExecutor for HttpBridgeExecutor {
    async fn run(
        &self,
        agent_id: &str,
        agent_role: &str,
        input: &Map<String, Value>,
        context: Option<&Value>,
    ) -> Result<Value, TaskError> {
        let url = self.run_url(agent_id)?;
        let body = RunRequest {
            agent_id,
            agent_role,
            system_prompt: system_prompt_for(agent_role),
            model: &self.model,
            temperature: self.temperature,
            input,
            context,
        };
        debug!(agent_id, url = %url, "Dispatching task to agent bridge");

        let mut request = self.client.post(url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TaskError::Transport(format!("agent '{}' timed out: {}", agent_id, e))
            } else {
                TaskError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TaskError::Agent(format!(
                "agent '{}' returned {}: {}",
                agent_id,
                status.as_u16(),
                text.trim()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TaskError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| {
            TaskError::InvalidResponse(format!("agent '{}' sent non-JSON body: {}", agent_id, e))
        })
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
