// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Credential lookup behind a trait so a real identity store can be swapped
//! in without touching the handlers.

use std::collections::HashMap;

/// Verifies a username/password pair against some identity store.
pub trait CredentialLookup: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// In-memory credential set, fixed for the process lifetime.
///
/// Usernames are unique by construction; the map is never mutated after
/// startup and never persisted.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    users: HashMap<String, String>,
}

impl StaticCredentialStore {
    /// The demo account set.
    pub fn seeded() -> Self {
        Self::from_pairs([("user1", "123"), ("user2", "456")])
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            users: pairs
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialLookup for StaticCredentialStore {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map(|stored| stored == password)
            .unwrap_or(false)
    }
}
