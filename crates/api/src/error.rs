use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockroom_core::error::{CoreError, ErrorKind};

/// Message returned in place of any internal failure detail.
pub const SANITIZED_INTERNAL: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for ledger failures and adds a transport-level variant
/// for requests that never reach an engine.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A classified failure from the ledger engines.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed body, path or query string.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Core(core) => core.kind(),
            AppError::BadRequest(_) => ErrorKind::Invalid,
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            AppError::Core(core) if kind == ErrorKind::Internal => {
                tracing::error!(error = %core, "Internal ledger error");
                SANITIZED_INTERNAL.to_string()
            }
            AppError::Core(core) => core.message(),
            AppError::BadRequest(msg) => msg.clone(),
        };

        let body = json!({
            "error": {
                "code": kind.as_str(),
                "message": message,
            }
        });

        (status_for(kind), axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
