// Mapping of ledger failures to HTTP responses
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use forum_votes_ledger::LedgerError;
use tracing::{error, warn};

/// Error returned by request handlers.
///
/// Client mistakes map to 4xx; contention and store timeouts map to 503 with a
/// `Retry-After` hint; anything else is a 500 whose details stay in the logs.
#[derive(Debug)]
pub enum ApiError {
    Ledger(LedgerError),
    /// The path segment is not a post id, so no post can match it.
    UnknownPost(String),
    BadRequest(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::NotFound(_)) | ApiError::UnknownPost(_) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::InvalidInput(_)) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(LedgerError::Conflict(_) | LedgerError::Timeout(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Ledger(LedgerError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Ledger(LedgerError::Repository(_)) => "Internal server error".to_string(),
            ApiError::Ledger(e) => e.to_string(),
            ApiError::UnknownPost(raw) => format!("Post not found: {raw}"),
            ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Ledger(e @ LedgerError::Repository(_)) => error!(error = %e, "Request failed"),
            ApiError::Ledger(e) if e.is_retriable() => warn!(error = %e, "Request can be retried"),
            _ => {}
        }

        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.message(),
        }));

        match &self {
            ApiError::Ledger(e) if e.is_retriable() => {
                (status, [(header::RETRY_AFTER, "1")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
