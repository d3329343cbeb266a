use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error envelope returned by the auth and user routes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("A user with this email already exists.")]
    DuplicateUser,

    #[error("User not found")]
    NotFound,

    #[error("This account was created with GitHub; password login is not available")]
    WrongAuthMethod,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("{0}")]
    OAuthExchange(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUser => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::WrongAuthMethod => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::OAuthExchange(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{err:#}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(detail = %detail, "request failed");
        }
        let status = self.status();
        let body = ErrorBody {
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_shape() {
        let body = ErrorBody {
            message: "User not found".into(),
            status: 404,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "User not found");
        assert_eq!(json["status"], 404);
    }

    #[test]
    fn internal_hides_detail() {
        let err = ApiError::Internal("connection refused".into());
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn duplicate_message_mentions_already_exists() {
        assert!(ApiError::DuplicateUser.to_string().contains("already exists"));
    }
}
