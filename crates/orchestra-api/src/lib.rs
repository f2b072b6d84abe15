//! # Orchestra API
//!
//! HTTP surface over the workflow [`Orchestrator`](orchestra_core::Orchestrator).
//!
//! ```text
//! GET    /                        - Service banner
//! GET    /health                  - Health and workflow counts
//! POST   /run-graph               - Submit a workflow
//! GET    /status/{workflow_id}    - Workflow status
//! GET    /workflows               - List workflows (?status=&limit=)
//! DELETE /workflows/{workflow_id} - Delete a workflow
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
