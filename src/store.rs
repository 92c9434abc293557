// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store.
//!
//! The auth core only ever reads from the store through
//! [`CredentialStore::lookup`]. The in-memory implementation is seeded once
//! at startup and shared behind an `Arc` without locks.

use std::collections::HashMap;
use std::fmt;

use crate::auth::{CredentialError, Principal, Role};

/// A stored account: identity, password hash, and whether it may log in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub role: Role,
    pub password_hash: String,
    pub active: bool,
}

impl Credential {
    /// Hash `password` with bcrypt at `cost` and build an active credential.
    pub fn with_password(
        username: impl Into<String>,
        role: Role,
        password: &str,
        cost: u32,
    ) -> Result<Self, CredentialError> {
        Ok(Self {
            username: username.into(),
            role,
            password_hash: bcrypt::hash(password, cost)?,
            active: true,
        })
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.username.clone(), self.role)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("password_hash", &"<redacted>")
            .field("active", &self.active)
            .finish()
    }
}

/// Read-only lookup of accounts by username.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<Credential>;
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: HashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the two built-in accounts (`usuario` and `admin`).
    pub fn with_default_accounts(cost: u32) -> Result<Self, CredentialError> {
        let mut store = Self::new();
        store.insert(Credential::with_password(
            "usuario",
            Role::User,
            "L0XuwPOdS5U",
            cost,
        )?)?;
        store.insert(Credential::with_password(
            "admin",
            Role::Admin,
            "JKSipm0YH",
            cost,
        )?)?;
        Ok(store)
    }

    /// Add a credential. Usernames are unique.
    pub fn insert(&mut self, credential: Credential) -> Result<(), CredentialError> {
        if self.credentials.contains_key(&credential.username) {
            return Err(CredentialError::DuplicateUsername(credential.username));
        }
        self.credentials
            .insert(credential.username.clone(), credential);
        Ok(())
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, username: &str) -> Option<Credential> {
        self.credentials.get(username).cloned()
    }
}
