// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Login endpoint: exchanges credentials for an identity token.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use super::http_server::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/login
///
/// 200 with a signed token on success, 400 when either field is missing,
/// 401 when the credentials are wrong.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, password) = match (request.username, request.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(ApiError::MissingCredentials),
    };

    if !state.credentials.verify(&username, &password) {
        tracing::debug!(user = %username, "login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&username)?;
    tracing::info!(user = %username, "login succeeded");

    Ok(Json(LoginResponse { token }))
}
