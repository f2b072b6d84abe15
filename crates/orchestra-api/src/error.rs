//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use orchestra_core::OrchestraError;

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (bad query value, unreadable body).
    #[error("{0}")]
    BadRequest(String),

    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Resource already exists.
    #[error("{0}")]
    Conflict(String),

    /// Well-formed request the workflow rules reject.
    #[error("{0}")]
    Unprocessable(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<OrchestraError> for ApiError {
    fn from(err: OrchestraError) -> Self {
        let message = err.to_string();
        match err {
            OrchestraError::WorkflowNotFound(_) => ApiError::NotFound(message),
            OrchestraError::DuplicateWorkflow(_) => ApiError::Conflict(message),
            OrchestraError::InvalidWorkflow(_) => ApiError::Unprocessable(message),
            OrchestraError::InvalidTransition { .. }
            | OrchestraError::Store(_)
            | OrchestraError::Orchestration(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestra_error_mapping() {
        let cases = vec![
            (OrchestraError::WorkflowNotFound("x".into()), StatusCode::NOT_FOUND),
            (OrchestraError::DuplicateWorkflow("x".into()), StatusCode::CONFLICT),
            (
                OrchestraError::InvalidWorkflow("no tasks".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                OrchestraError::Store("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_message_preserved() {
        let err = ApiError::from(OrchestraError::WorkflowNotFound("wf-9".into()));
        assert_eq!(err.to_string(), "Workflow wf-9 not found");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::BadRequest("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
