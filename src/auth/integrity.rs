// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role integrity tags.
//!
//! A token's role claim is bound to its subject by an HMAC-SHA-256 tag over
//! `username|role` under a key separate from (or derived from) the token
//! signing key. Someone able to re-sign the outer token still cannot lift a
//! role without also holding the integrity key.

use std::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::roles::Role;

type HmacSha256 = Hmac<Sha256>;

/// Domain separator for deriving the integrity key from the signing key.
const DERIVATION_LABEL: &[u8] = b"rolegate/role-integrity/v1";

/// Computes and checks role integrity tags.
#[derive(Clone)]
pub struct RoleIntegritySigner {
    key: Vec<u8>,
}

impl fmt::Debug for RoleIntegritySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleIntegritySigner")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl RoleIntegritySigner {
    /// Use `key` directly as the integrity key.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Derive the integrity key from the token signing secret.
    pub fn derived_from(signing_secret: &[u8]) -> Self {
        Self::new(hmac_sha256(signing_secret, DERIVATION_LABEL))
    }

    /// Tag for `(username, role)`, base64url without padding.
    pub fn tag(&self, username: &str, role: Role) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(username.as_bytes());
        mac.update(b"|");
        mac.update(role.as_str().as_bytes());
        Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes())
    }

    /// Recompute the tag and compare without early exit.
    pub fn check(&self, username: &str, role: Role, tag: &str) -> bool {
        let expected = self.tag(username, role);
        constant_time_eq(expected.as_bytes(), tag.as_bytes())
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Byte equality that touches every byte regardless of where the first
/// difference is. Only the length is allowed to short-circuit; tag lengths
/// are public.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
