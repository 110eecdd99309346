//! API error taxonomy and HTTP mapping
//!
//! Every failure leaves the server as `{error, details}` JSON:
//! - `InvalidCommand` → 400 (malformed gatekeeper input, never executed)
//! - `Forbidden` → 403 (disallowed subcommand, never executed)
//! - `ExecutionFailure` → 500 (the spawned process said no; stderr verbatim)
//! - `Upstream` → 502 (the cluster API said no)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::exec::{ExecError, GatekeeperError};

/// Classified API failure
#[derive(Debug)]
pub enum ApiError {
    InvalidCommand(String),
    Forbidden(String),
    ExecutionFailure(String),
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCommand(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::ExecutionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidCommand(_) => "invalid command",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::ExecutionFailure(_) => "execution failed",
            ApiError::Upstream(_) => "cluster error",
        }
    }

    fn details(&self) -> &str {
        match self {
            ApiError::InvalidCommand(d)
            | ApiError::Forbidden(d)
            | ApiError::ExecutionFailure(d)
            | ApiError::Upstream(d) => d,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.kind(),
            "details": self.details(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<GatekeeperError> for ApiError {
    fn from(err: GatekeeperError) -> Self {
        match &err {
            GatekeeperError::InvalidCommand(_) => ApiError::InvalidCommand(err.to_string()),
            GatekeeperError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl From<ExecError> for ApiError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::NonZeroExit { stderr, .. } => ApiError::ExecutionFailure(stderr),
            spawn @ ExecError::Spawn { .. } => ApiError::ExecutionFailure(spawn.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Chained context, e.g. "Failed to list pods in namespace x: ..."
        ApiError::Upstream(format!("{:#}", err))
    }
}
