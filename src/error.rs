use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::response::ApiResponse;

/// Failure taxonomy for the HTTP surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input: failed payload validation or an unparseable id.
    #[error("{0}")]
    BadRequest(String),
    /// Duplicate username or email on registration.
    #[error("{0}")]
    Conflict(String),
    /// Wrong password on login. 400 on purpose, not 401.
    #[error("{0}")]
    IncorrectCredentials(String),
    /// Resource absent, or an ownership mismatch collapsed into it.
    #[error("{0}")]
    NotFound(String),
    /// Anything unexpected, store failures included.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::Conflict(_)
            | ApiError::IncorrectCredentials(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Internal(e) => {
                error!(error = %e, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": { "message": e.to_string() } })),
                )
                    .into_response()
            }
            other => {
                let status = other.status_code();
                (status, Json(ApiResponse::error(other.to_string()))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::IncorrectCredentials("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn business_rejections_keep_their_status() {
        let res = ApiError::NotFound("Blog not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = ApiError::IncorrectCredentials("Password incorrect".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_become_500() {
        let res = ApiError::Internal(anyhow::anyhow!("store down")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
