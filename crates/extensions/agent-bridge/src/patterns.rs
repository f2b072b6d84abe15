//! Ready-made workflow definitions for common agent pipelines.

use serde_json::{Value, json};

use orchestra_core::{ExecutionMode, TaskDefinition, WorkflowDefinition};

use crate::roles::AgentRole;

/// Review aspects covered by [`code_review_pipeline`], one QA agent each.
const REVIEW_FOCUSES: [&str; 3] = ["security", "performance", "style"];

fn task(agent_id: &str, role: AgentRole) -> TaskDefinition {
    TaskDefinition::new(agent_id, role.as_str())
}

/// Frontend, backend, QA, debugger, then a second QA pass, run in order.
///
/// The feature description goes to the first agent; later agents build on
/// the previous result.
pub fn full_stack_development_pipeline(feature_description: &str) -> WorkflowDefinition {
    let tasks = vec![
        task("fs-frontend", AgentRole::Frontend)
            .with_input("feature_description", Value::String(feature_description.to_string())),
        task("fs-backend", AgentRole::Backend),
        task("fs-qa-1", AgentRole::Qa),
        task("fs-debugger", AgentRole::Debugger),
        task("fs-qa-2", AgentRole::Qa),
    ];

    WorkflowDefinition::new(ExecutionMode::Sequential, tasks)
        .with_metadata("workflow_name", json!("full_stack_development"))
}

/// Security, performance and style reviews of the same code, run concurrently.
pub fn code_review_pipeline(code: &str, language: &str) -> WorkflowDefinition {
    let tasks = REVIEW_FOCUSES
        .iter()
        .map(|focus| {
            task(&format!("qa-{}", focus), AgentRole::Qa)
                .with_input("code", Value::String(code.to_string()))
                .with_input("language", Value::String(language.to_string()))
                .with_input("focus", json!(focus))
        })
        .collect();

    WorkflowDefinition::new(ExecutionMode::Parallel, tasks)
        .with_metadata("workflow_name", json!("code_review_parallel"))
}
