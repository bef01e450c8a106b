use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::auth::AuthError;
use crate::pages::PageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Validation(message) => ApiError::InvalidPayload(message),
            PageError::TooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            PageError::NotFound(_) => ApiError::NotFound("Page not found".to_string()),
            PageError::Io { name, source } => {
                tracing::error!(name, error = %source, "Page storage failure");
                ApiError::Internal(format!("storage failure on {name}"))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::UnknownToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::MissingCapability(_) | AuthError::BadNonce => {
                ApiError::Forbidden(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Capability;

    #[test]
    fn test_page_error_mapping() {
        let err: ApiError = PageError::Validation("All fields are required".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "All fields are required");

        let err: ApiError = PageError::TooLarge { size: 10, limit: 5 }.into();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let err: ApiError = PageError::NotFound("x.html".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = PageError::Io {
            name: "x.html".into(),
            source: std::io::Error::other("disk full"),
        }
        .into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.to_string().contains("disk full"));
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = AuthError::MissingCredentials.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err: ApiError = AuthError::MissingCapability(Capability::EditPages).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Insufficient permissions");

        let err: ApiError = AuthError::BadNonce.into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Security check failed");
    }
}
