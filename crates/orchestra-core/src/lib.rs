//! Orchestra core: workflow definitions, task lifecycle and the scheduler.
//!
//! A workflow is a set of agent tasks run in one of three modes:
//! - **sequential**: in submission order, each task seeing the previous result
//! - **parallel**: all at once, isolated from each other
//! - **graph**: each task waits on the completion signals of its dependencies
//!
//! The [`Scheduler`] drives a stored workflow to a terminal state through a
//! [`TaskExecutor`], and the [`Orchestrator`] is the submit/query surface
//! callers use.

pub mod definition;
pub mod error;
pub mod executor;
pub mod mock_executor;
pub mod orchestrator;
pub mod record;
pub mod scheduler;
pub mod signal;
pub mod status;
pub mod store;
pub mod validation;

pub use definition::{ExecutionMode, TaskDefinition, WorkflowDefinition};
pub use error::{OrchestraError, Result, TaskError};
pub use executor::TaskExecutor;
pub use orchestrator::{DEFAULT_LIST_LIMIT, Orchestrator};
pub use record::{TaskRecord, TaskStatus, WorkflowRecord, WorkflowStatus};
pub use scheduler::{DependencyFailurePolicy, Scheduler, SchedulerOptions};
pub use store::{ListQuery, MemoryWorkflowStore, WorkflowStore};
