// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stateless identity tokens: HS256-signed JWTs carrying a username and an
//! expiry. Tokens are bearer-held; there is no server-side store and no
//! revocation within the validity window.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub username: String,
    pub exp: u64,
}

/// Token verification error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
    #[error("Token is missing")]
    Missing,

    #[error("Invalid or expired token")]
    InvalidOrExpired,

    #[error("Failed to sign token")]
    Signing,
}

/// Issues and verifies identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact: the 1-hour window ends at exp, not exp + leeway.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Token validity window in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Create a signed token for an already-authenticated username.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        let claims = Claims {
            username: username.to_string(),
            exp: jsonwebtoken::get_current_timestamp() + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            TokenError::Signing
        })
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidOrExpired)
    }

    /// Verify a raw `Authorization` header value of the shape
    /// `<scheme> <token>`. The scheme prefix is not validated; a value with
    /// no second whitespace-separated component is rejected as invalid.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, TokenError> {
        let value = header.ok_or(TokenError::Missing)?;
        let token = value
            .split_whitespace()
            .nth(1)
            .ok_or(TokenError::InvalidOrExpired)?;
        self.verify(token)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
