//! Task executors for Orchestra agents.
//!
//! - [`SimulatedExecutor`] answers in-process after a fixed delay.
//! - [`HttpBridgeExecutor`] forwards each task to an external agent service.
//!
//! [`patterns`] holds canned pipelines built from the role catalogue.

mod bridge;
pub mod patterns;
mod roles;
mod simulated;

pub use patterns::{code_review_pipeline, full_stack_development_pipeline};
pub use bridge::{BridgeConfig, BridgeError, HttpBridgeExecutor};
pub use roles::{AgentRole, system_prompt_for};
pub use simulated::SimulatedExecutor;
