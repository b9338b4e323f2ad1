// Typed errors: summary validation at the boundary, and API responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why an incoming summary was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("summary is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("daemonCount ({daemon}) + nonDaemonCount ({non_daemon}) != totalThreads ({total})")]
    DaemonMismatch {
        daemon: u32,
        non_daemon: u32,
        total: u32,
    },
    #[error("totalThreads ({total}) is less than the {listed} threads listed")]
    ThreadCountMismatch { total: u32, listed: usize },
    #[error("thread at index {index} has an empty name")]
    EmptyThreadName { index: usize },
    #[error("thread {name:?} has priority {priority}, expected 1..=10")]
    InvalidPriority { name: String, priority: i32 },
    #[error("thread name {0:?} appears more than once")]
    DuplicateThread(String),
    #[error("summary references unknown thread {0:?}")]
    UnknownThread(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no summary loaded")]
    NoSummary,
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    InvalidSummary(#[from] SummaryError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoSummary | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidSummary(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
