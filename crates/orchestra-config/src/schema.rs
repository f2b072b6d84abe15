//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Cross-origin settings for the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Workflow scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Role whose failures do not halt a sequential workflow.
    #[serde(default = "default_qa_role")]
    pub qa_role: String,

    /// Cap on concurrently running tasks. Unset means unbounded.
    #[serde(default)]
    pub max_concurrent_tasks: Option<usize>,

    /// What a graph dependent does when a dependency failed.
    #[serde(default)]
    pub dependency_failure: DependencyFailure,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            qa_role: default_qa_role(),
            max_concurrent_tasks: None,
            dependency_failure: DependencyFailure::default(),
        }
    }
}

fn default_qa_role() -> String {
    "qa".to_string()
}

/// Graph-mode handling of failed dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyFailure {
    /// Dependents run without the failed dependency in their context.
    #[default]
    Proceed,
    /// Dependents fail without running.
    FailDependents,
}

/// Which task executor backs the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    /// In-process simulated agents.
    #[default]
    Simulated,
    /// Remote agents behind an HTTP bridge.
    Bridge,
}

/// Task executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default, rename = "type")]
    pub kind: ExecutorKind,

    /// Simulated work per task.
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,

    /// Agents the simulated executor fails on purpose.
    #[serde(default)]
    pub fail_agents: Vec<String>,

    /// Base URL of the agent bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_url: Option<String>,

    /// Bearer token sent to the bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Model the bridge asks each agent to use.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kind: ExecutorKind::default(),
            simulated_delay_ms: default_simulated_delay_ms(),
            fail_agents: Vec::new(),
            bridge_url: None,
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
            llm_model: default_llm_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_simulated_delay_ms() -> u64 {
    1000
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(default)]
    pub file_dir: Option<PathBuf>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_dir: None,
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "orchestra.log".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
