//! Tests for the configuration schema.

use super::*;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
    assert_eq!(config.scheduler.qa_role, "qa");
    assert_eq!(config.scheduler.max_concurrent_tasks, None);
    assert_eq!(config.scheduler.dependency_failure, DependencyFailure::Proceed);
    assert_eq!(config.executor.kind, ExecutorKind::Simulated);
    assert_eq!(config.executor.simulated_delay_ms, 1000);
    assert_eq!(config.executor.llm_model, "gpt-4o");
    assert_eq!(config.executor.temperature, 0.7);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file_dir.is_none());
}

#[test]
fn test_empty_toml_matches_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.server.port, Config::default().server.port);
    assert_eq!(config.executor.timeout_seconds, 300);
}

#[test]
fn test_executor_type_field() {
    let config: Config = toml::from_str(
        r#"
        [executor]
        type = "bridge"
        bridge_url = "http://localhost:4000"
        "#,
    )
    .unwrap();
    assert_eq!(config.executor.kind, ExecutorKind::Bridge);
    assert_eq!(config.executor.bridge_url.as_deref(), Some("http://localhost:4000"));
}

#[test]
fn test_unknown_executor_type_rejected() {
    let result: Result<Config, _> = toml::from_str(
        r#"
        [executor]
        type = "carrier-pigeon"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_serialize_roundtrip_keeps_type_key() {
    let mut config = Config::default();
    config.executor.kind = ExecutorKind::Bridge;
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("type = \"bridge\""));
}

#[test]
fn test_dependency_failure_values() {
    let config: Config = toml::from_str(
        r#"
        [scheduler]
        dependency_failure = "fail_dependents"
        "#,
    )
    .unwrap();
    assert_eq!(config.scheduler.dependency_failure, DependencyFailure::FailDependents);
}

#[test]
fn test_unknown_dependency_failure_rejected_at_parse() {
    let result: Result<Config, _> = toml::from_str(
        r#"
        [scheduler]
        dependency_failure = "retry"
        "#,
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("retry"));
}
