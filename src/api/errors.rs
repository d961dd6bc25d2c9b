// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! API error taxonomy and the JSON envelope it serializes to.
//!
//! Every failure the API can report carries a real status code; the image
//! endpoint never answers a 200-shaped error string.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::TokenError;

/// Wire shape of an API error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is missing")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("No file part in request")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not decode image: {0}")]
    InvalidImage(String),

    #[error("Detection model is not available")]
    ModelUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials
            | ApiError::MissingFile
            | ApiError::EmptyFilename
            | ApiError::InvalidRequest(_)
            | ApiError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidOrExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::MissingToken => StatusCode::FORBIDDEN,
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::MissingCredentials => "missing_credentials",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::MissingToken => "missing_token",
            ApiError::InvalidOrExpiredToken => "invalid_or_expired_token",
            ApiError::MissingFile => "missing_file",
            ApiError::EmptyFilename => "empty_filename",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::InvalidImage(_) => "invalid_image",
            ApiError::ModelUnavailable => "model_unavailable",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Internal(_)) {
            tracing::error!("request failed: {}", self);
        }
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => ApiError::MissingToken,
            TokenError::InvalidOrExpired => ApiError::InvalidOrExpiredToken,
            TokenError::Signing => ApiError::Internal("Failed to sign token".to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::MissingToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::InvalidOrExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::MissingFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ModelUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            ApiError::from(TokenError::Missing),
            ApiError::MissingToken
        ));
        assert!(matches!(
            ApiError::from(TokenError::InvalidOrExpired),
            ApiError::InvalidOrExpiredToken
        ));
    }

    #[test]
    fn test_response_envelope() {
        let response = ApiError::EmptyFilename.to_response();
        assert_eq!(response.error_type, "empty_filename");
        assert_eq!(response.message, "No selected file");
    }
}
