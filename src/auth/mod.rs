// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request authentication: credential store, token issue/verify, auth gate.

pub mod credentials;
pub mod middleware;
pub mod token;

pub use credentials::{CredentialLookup, StaticCredentialStore};
pub use middleware::{require_auth, AuthedUser};
pub use token::{Claims, TokenError, TokenService};
