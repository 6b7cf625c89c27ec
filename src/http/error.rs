//! Translation of pipeline failures into HTTP responses.

use crate::error::ConvertError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// API error type.
///
/// Validation failures are rejected here, before a job exists; pipeline
/// failures arrive via the `From<ConvertError>` conversion and keep their
/// stage tag in the JSON payload.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The upload was well-formed but could not be converted; `stage`
    /// names the pipeline step that rejected it.
    Unprocessable {
        stage: &'static str,
        message: String,
    },
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, stage, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, None, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, None, msg),
            Self::Unprocessable { stage, message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, Some(stage), message)
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, None, msg)
            }
        };

        let body = match stage {
            Some(stage) => serde_json::json!({ "error": message, "stage": stage }),
            None => serde_json::json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        match &err {
            ConvertError::InvalidJobName { .. } | ConvertError::InvalidConfig(_) => {
                Self::BadRequest(err.to_string())
            }
            // The client's archive is at fault: corrupt, missing its
            // source, or uncompilable.
            ConvertError::Extraction { .. }
            | ConvertError::ExtractionTimedOut { .. }
            | ConvertError::SourceNotFound { .. }
            | ConvertError::CompilationFailed { .. }
            | ConvertError::CompilationTimedOut { .. } => Self::Unprocessable {
                stage: err.stage().map(|s| s.as_str()).unwrap_or("convert"),
                message: err.to_string(),
            },
            // Server-side trouble: workspace, staging, or plain I/O.
            ConvertError::WorkspaceReset { .. }
            | ConvertError::ArtifactNotProduced { .. }
            | ConvertError::Io { .. } => Self::Internal(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
