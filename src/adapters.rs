//! Translation from loaded configuration to runtime components.

use std::sync::Arc;
use std::time::Duration;

use orchestra_agent_bridge::{BridgeConfig, BridgeError, HttpBridgeExecutor, SimulatedExecutor};
use orchestra_api::ApiConfig;
use orchestra_config::{Config, DependencyFailure, ExecutorConfig, ExecutorKind, SchedulerConfig};
use orchestra_core::{DependencyFailurePolicy, SchedulerOptions, TaskExecutor};

/// Build the task executor selected by `[executor] type`.
pub(crate) fn build_executor(config: &ExecutorConfig) -> Result<Arc<dyn TaskExecutor>, BridgeError> {
    match config.kind {
        ExecutorKind::Simulated => Ok(Arc::new(
            SimulatedExecutor::new()
                .with_delay(Duration::from_millis(config.simulated_delay_ms))
                .with_failing_agents(config.fail_agents.iter().cloned()),
        )),
        ExecutorKind::Bridge => {
            let url = config.bridge_url.clone().unwrap_or_default();
            let mut bridge = BridgeConfig::new(url)
                .with_timeout(Duration::from_secs(config.timeout_seconds))
                .with_model(config.llm_model.clone())
                .with_temperature(config.temperature);
            if let Some(token) = &config.api_token {
                bridge = bridge.with_token(token.clone());
            }
            Ok(Arc::new(HttpBridgeExecutor::new(bridge)?))
        }
    }
}

pub(crate) fn scheduler_options(config: &SchedulerConfig) -> SchedulerOptions {
    let dependency_failure = match config.dependency_failure {
        DependencyFailure::Proceed => DependencyFailurePolicy::Proceed,
        DependencyFailure::FailDependents => DependencyFailurePolicy::FailDependents,
    };

    SchedulerOptions {
        qa_role: config.qa_role.clone(),
        max_concurrent_tasks: config.max_concurrent_tasks,
        dependency_failure,
    }
}

pub(crate) fn api_config(config: &Config) -> ApiConfig {
    ApiConfig::new(config.server.host.clone(), config.server.port)
        .with_allowed_origins(config.cors.allowed_origins.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_options_mapping() {
        let config = SchedulerConfig {
            qa_role: "tester".to_string(),
            max_concurrent_tasks: Some(4),
            dependency_failure: DependencyFailure::FailDependents,
        };
        let options = scheduler_options(&config);
        assert_eq!(options.qa_role, "tester");
        assert_eq!(options.max_concurrent_tasks, Some(4));
        assert_eq!(options.dependency_failure, DependencyFailurePolicy::FailDependents);
    }

    #[test]
    fn test_scheduler_options_default_policy() {
        let options = scheduler_options(&SchedulerConfig::default());
        assert_eq!(options, SchedulerOptions::default());
    }

    #[test]
    fn test_build_simulated_executor() {
        assert!(build_executor(&ExecutorConfig::default()).is_ok());
    }

    #[test]
    fn test_build_bridge_executor_requires_url() {
        let config = ExecutorConfig {
            kind: ExecutorKind::Bridge,
            ..ExecutorConfig::default()
        };
        assert!(build_executor(&config).is_err());

        let config = ExecutorConfig {
            kind: ExecutorKind::Bridge,
            bridge_url: Some("http://localhost:4000".to_string()),
            api_token: Some("token".to_string()),
            llm_model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            ..ExecutorConfig::default()
        };
        assert!(build_executor(&config).is_ok());
    }

    #[test]
    fn test_api_config_from_config() {
        let mut config = Config::default();
        config.server.port = 9100;
        config.cors.allowed_origins = vec!["*".to_string()];
        let api = api_config(&config);
        assert_eq!(api.host, "0.0.0.0");
        assert_eq!(api.port, 9100);
        assert_eq!(api.allowed_origins, vec!["*"]);
    }
}
