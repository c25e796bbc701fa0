use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use passvault_crypto::GenerateError;
use passvault_db::StoreError;
use passvault_types::api::ErrorBody;

use crate::token::TokenError;

/// Every way a request can be rejected. Each variant has a stable kind string
/// that clients can match on.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(#[from] TokenError),

    #[error("User not found")]
    UnknownUser,

    #[error("No passwords found for user")]
    NoHistory,

    #[error("{0}")]
    InvalidLength(#[from] GenerateError),

    #[error("Invalid password")]
    PasswordMismatch,

    #[error("Not authorized to modify this user")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::DuplicateUsername => "DuplicateUsername",
            ApiError::InvalidCredentials => "InvalidCredentials",
            ApiError::Unauthenticated(_) => "Unauthenticated",
            ApiError::UnknownUser => "UnknownUser",
            ApiError::NoHistory => "NoHistory",
            ApiError::InvalidLength(_) => "InvalidLength",
            ApiError::PasswordMismatch => "PasswordMismatch",
            ApiError::Forbidden => "Forbidden",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Internal(_) => "InternalError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DuplicateUsername
            | ApiError::InvalidLength(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::Unauthenticated(_)
            | ApiError::PasswordMismatch => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::UnknownUser | ApiError::NoHistory => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ApiError::DuplicateUsername,
            StoreError::UnknownUser => ApiError::UnknownUser,
            other => ApiError::Internal(other.into()),
        }
    }
}

// Extractor rejections (bad JSON, missing fields, wrong content type, bad
// path or query values) get the same JSON body as every other error.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.kind().to_string(),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::Unauthenticated(_) = self {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
