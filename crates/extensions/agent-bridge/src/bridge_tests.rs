//! Tests for the HTTP bridge executor.

use super::*;
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn executor(server: &MockServer) -> HttpBridgeExecutor {
    HttpBridgeExecutor::new(BridgeConfig::new(server.uri())).unwrap()
}

#[test]
fn test_invalid_base_url() {
    let err = HttpBridgeExecutor::new(BridgeConfig::new("not a url")).err().unwrap();
    assert!(matches!(err, BridgeError::InvalidUrl { .. }));
}

#[test]
fn test_run_url_escapes_agent_id() {
    let exec = HttpBridgeExecutor::new(BridgeConfig::new("http://bridge.local/api/")).unwrap();
    let url = exec.run_url("team a/1").unwrap();
    assert_eq!(url.as_str(), "http://bridge.local/api/agents/team%20a%2F1/run");
}

#[tokio::test]
async fn test_run_success() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/agents/be-1/run"))
        .and(matchers::body_partial_json(json!({
            "agent_id": "be-1",
            "agent_role": "backend",
            "input": {"endpoint": "/login"},
            "context": {"design": "done"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "fn login() {}"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut input = Map::new();
    input.insert("endpoint".into(), json!("/login"));
    let result = executor(&server)
        .run("be-1", "backend", &input, Some(&json!({"design": "done"})))
        .await
        .unwrap();

    assert_eq!(result, json!({"code": "fn login() {}"}));
}

#[tokio::test]
async fn test_sends_role_prompt() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_partial_json(json!({
            "system_prompt": crate::roles::AgentRole::Qa.system_prompt(),
            "context": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"passed": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let result = executor(&server).run("qa-1", "qa", &Map::new(), None).await.unwrap();
    assert_eq!(result["passed"], 12);
}

#[tokio::test]
async fn test_sends_model_params() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.2,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = BridgeConfig::new(server.uri())
        .with_model("gpt-4o-mini")
        .with_temperature(0.2);
    let exec = HttpBridgeExecutor::new(config).unwrap();
    assert!(exec.run("fe-1", "frontend", &Map::new(), None).await.is_ok());
}

#[tokio::test]
async fn test_default_model_params() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_partial_json(json!({"model": "gpt-4o", "temperature": 0.7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(executor(&server).run("a", "backend", &Map::new(), None).await.is_ok());
}

#[tokio::test]
async fn test_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::header("Authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let exec = HttpBridgeExecutor::new(BridgeConfig::new(server.uri()).with_token("s3cret")).unwrap();
    assert!(exec.run("a", "backend", &Map::new(), None).await.is_ok());
}

#[tokio::test]
async fn test_error_status_becomes_task_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("agent crashed"))
        .mount(&server)
        .await;

    let err = executor(&server)
        .run("dbg-1", "debugger", &Map::new(), None)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"));
    assert!(message.contains("agent crashed"));
    assert!(message.contains("dbg-1"));
}

#[tokio::test]
async fn test_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let err = executor(&server)
        .run("fe-1", "frontend", &Map::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let exec = HttpBridgeExecutor::new(
        BridgeConfig::new(server.uri()).with_timeout(Duration::from_millis(50)),
    )
    .unwrap();
    let err = exec.run("slow", "backend", &Map::new(), None).await.unwrap_err();
    assert!(matches!(err, TaskError::Transport(_)));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_unreachable_bridge() {
    let exec = HttpBridgeExecutor::new(BridgeConfig::new("http://127.0.0.1:9")).unwrap();
    let err = exec.run("a", "backend", &Map::new(), None).await.unwrap_err();
    assert!(matches!(err, TaskError::Transport(_)));
}
