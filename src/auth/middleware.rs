// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Auth gate applied to protected routes.
//!
//! Extracts the bearer token from the `Authorization` header and rejects the
//! request before the handler runs: 403 when the header is absent, 401 when
//! the token is invalid or expired. On success the verified username is
//! inserted into request extensions for the handler.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// Verified identity of the caller, available via `Extension` in protected
/// handlers.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub String);

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.tokens.verify_header(header)?;

    tracing::debug!(user = %claims.username, "request authenticated");
    request.extensions_mut().insert(AuthedUser(claims.username));

    Ok(next.run(request).await)
}
