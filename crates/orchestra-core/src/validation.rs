//! Submission-time validation of workflow definitions.
//!
//! Graph workflows key their completion signals by agent id, so an unknown
//! dependency or a cycle would suspend dependents forever. Both are rejected
//! here instead of being discovered as a hung run.

use std::collections::{HashMap, HashSet};

use crate::definition::{ExecutionMode, TaskDefinition, WorkflowDefinition};
use crate::error::{OrchestraError, Result};

/// Validate a workflow definition before it is stored or scheduled.
pub fn validate_definition(definition: &WorkflowDefinition) -> Result<()> {
    if let Some(id) = &definition.workflow_id {
        if id.trim().is_empty() {
            return Err(invalid("workflow_id cannot be empty"));
        }
    }

    validate_tasks(definition.workflow_type, &definition.tasks)
}

/// Validate a task list for the given execution mode.
pub fn validate_tasks(mode: ExecutionMode, tasks: &[TaskDefinition]) -> Result<()> {
    if tasks.is_empty() {
        return Err(invalid("workflow has no tasks"));
    }

    let mut seen = HashSet::new();
    for (i, task) in tasks.iter().enumerate() {
        if task.agent_id.trim().is_empty() {
            return Err(invalid(format!("task {} has an empty agent_id", i)));
        }
        if !seen.insert(task.agent_id.as_str()) && mode == ExecutionMode::Graph {
            return Err(invalid(format!(
                "duplicate agent_id '{}' in graph workflow",
                task.agent_id
            )));
        }
    }

    for task in tasks {
        for dep in &task.depends_on {
            if dep == &task.agent_id {
                return Err(invalid(format!("task '{}' depends on itself", dep)));
            }
            if !seen.contains(dep.as_str()) {
                return Err(invalid(format!(
                    "task '{}' depends on unknown agent '{}'",
                    task.agent_id, dep
                )));
            }
        }
    }

    if mode == ExecutionMode::Graph {
        if let Some(cycle) = find_cycle(tasks) {
            return Err(invalid(format!("dependency cycle: {}", cycle.join(" -> "))));
        }
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> OrchestraError {
    OrchestraError::InvalidWorkflow(message.into())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search for a dependency cycle; returns the agent ids on it,
/// first id repeated at the end.
fn find_cycle(tasks: &[TaskDefinition]) -> Option<Vec<String>> {
    let edges: HashMap<&str, &[String]> = tasks
        .iter()
        .map(|t| (t.agent_id.as_str(), t.depends_on.as_slice()))
        .collect();

    let mut marks = HashMap::new();
    let mut path = Vec::new();
    tasks
        .iter()
        .find_map(|t| visit(t.agent_id.as_str(), &edges, &mut marks, &mut path))
}

fn visit<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, &'a [String]>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    match marks.get(node) {
        Some(Mark::Done) => return None,
        Some(Mark::Visiting) => {
            let start = path.iter().position(|n| *n == node)?;
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(node.to_string());
            return Some(cycle);
        }
        None => {}
    }

    marks.insert(node, Mark::Visiting);
    path.push(node);
    let deps: &'a [String] = edges.get(node).copied().unwrap_or(&[]);
    for dep in deps {
        if let Some(cycle) = visit(dep.as_str(), edges, marks, path) {
            return Some(cycle);
        }
    }
    path.pop();
    marks.insert(node, Mark::Done);
    None
}
