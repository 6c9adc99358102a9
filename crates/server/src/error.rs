use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ingest::IngestError;
use matcher::MatchError;
use planet_finder::ConfigLoadError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Malformed bulk input: {0}")]
    MalformedBulkInput(String),

    #[error("Bulk input too large: {0}")]
    PayloadTooLarge(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Match error: {0}")]
    Match(MatchError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::MalformedBulkInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Match(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::MalformedBulkInput(_) => "MALFORMED_BULK_INPUT",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::CatalogUnavailable(_) => "CATALOG_UNAVAILABLE",
            ServerError::Match(_) => "MATCH_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<MatchError> for ServerError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::MalformedBulkInput(msg) => ServerError::MalformedBulkInput(msg),
            other => ServerError::Match(other),
        }
    }
}

impl From<IngestError> for ServerError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedCsv(msg) => ServerError::MalformedBulkInput(msg),
            err @ IngestError::TooManyRows { .. } => ServerError::PayloadTooLarge(err.to_string()),
            err @ (IngestError::Io { .. } | IngestError::InvalidCatalog(_)) => {
                ServerError::CatalogUnavailable(err.to_string())
            }
            other => ServerError::Config(other.to_string()),
        }
    }
}

impl From<ConfigLoadError> for ServerError {
    fn from(err: ConfigLoadError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("worker task failed: {err}"))
    }
}
