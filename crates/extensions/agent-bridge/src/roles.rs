//! Agent role catalogue.

use std::str::FromStr;

const GENERIC_PROMPT: &str = "You are a helpful AI assistant.";

/// Known agent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Frontend,
    Backend,
    Qa,
    Debugger,
    Coordinator,
}

impl AgentRole {
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Frontend,
        AgentRole::Backend,
        AgentRole::Qa,
        AgentRole::Debugger,
        AgentRole::Coordinator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Frontend => "frontend",
            AgentRole::Backend => "backend",
            AgentRole::Qa => "qa",
            AgentRole::Debugger => "debugger",
            AgentRole::Coordinator => "coordinator",
        }
    }

    /// System prompt sent with every task for this role.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AgentRole::Frontend => {
                "You are a frontend development agent. Build user interfaces and \
                 client-side logic: typed React components, responsive styling, \
                 accessible markup and fast page loads. Return clean, well-structured code."
            }
            AgentRole::Backend => {
                "You are a backend development agent. Design and implement server-side \
                 logic: REST APIs, authentication, database schemas and queries, and \
                 careful error handling. Return production-ready code."
            }
            AgentRole::Qa => {
                "You are a quality assurance agent. Review code for defects, write unit \
                 and integration tests, check edge cases and security issues, and report \
                 findings with concrete, actionable feedback."
            }
            AgentRole::Debugger => {
                "You are a debugging agent. Read errors and stack traces, find the root \
                 cause, propose and apply a fix, and explain what went wrong and how to \
                 keep it from recurring."
            }
            AgentRole::Coordinator => {
                "You are a coordinator agent. Split objectives into subtasks, assign them \
                 to the right specialist agents, track dependencies and progress, and \
                 merge the results into one coherent outcome."
            }
        }
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown agent role '{}'", s))
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System prompt for a free-form role string; unknown roles get a generic one.
pub fn system_prompt_for(role: &str) -> &'static str {
    role.parse::<AgentRole>()
        .map(|r| r.system_prompt())
        .unwrap_or(GENERIC_PROMPT)
}
