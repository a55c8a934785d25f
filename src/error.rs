use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the HTTP API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Catalog unavailable: {0:#}")]
    Catalog(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "MISSING_PARAMETER",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Catalog(_) => "CATALOG_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
