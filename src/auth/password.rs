// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password verification.
//!
//! Every call performs exactly one bcrypt verification at the configured
//! cost, whether or not the username exists and whether or not the account
//! is active. A lookup miss verifies against a dummy hash generated at
//! startup, so its latency matches a wrong password for a real account.

use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::warn;

use super::claims::Principal;
use super::error::CredentialError;
use crate::store::CredentialStore;

pub struct PasswordVerifier {
    store: Arc<dyn CredentialStore>,
    dummy_hash: String,
}

impl PasswordVerifier {
    /// Build a verifier whose dummy hash uses the same cost as stored hashes.
    pub fn new(store: Arc<dyn CredentialStore>, cost: u32) -> Result<Self, CredentialError> {
        let mut filler = [0u8; 24];
        SystemRandom::new()
            .fill(&mut filler)
            .map_err(|_| CredentialError::Entropy)?;
        let dummy_hash = bcrypt::hash(Base64UrlUnpadded::encode_string(&filler), cost)?;

        Ok(Self { store, dummy_hash })
    }

    /// True when `candidate` is the password of an active account.
    pub fn verify(&self, username: &str, candidate: &str) -> bool {
        self.verify_principal(username, candidate).is_some()
    }

    /// Like [`verify`](Self::verify), returning the verified identity.
    pub fn verify_principal(&self, username: &str, candidate: &str) -> Option<Principal> {
        let Some(credential) = self.store.lookup(username) else {
            // Result discarded: the work is what matters.
            let _ = bcrypt::verify(candidate, &self.dummy_hash);
            return None;
        };

        let matches = match bcrypt::verify(candidate, &credential.password_hash) {
            Ok(matches) => matches,
            Err(_) => {
                warn!(%username, "Stored password hash is unreadable");
                false
            }
        };

        if matches && credential.active {
            Some(credential.principal())
        } else {
            None
        }
    }
}
