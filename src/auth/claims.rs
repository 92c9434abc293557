// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated principal representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried inside every issued token.
///
/// All fields are required; a token missing any of them fails to decode and
/// is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,

    /// Role granted at issuance
    pub role: Role,

    /// Keyed digest binding `role` to `sub`
    pub integrity_tag: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Unique token identifier
    pub jti: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Identity established by a verified password or a validated token.
///
/// This is the primary type handlers receive to represent the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// Exact role match, as used by role-gated routes.
    pub fn has_role(&self, required: Role) -> bool {
        self.role == required
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// A freshly signed token plus the metadata callers may want to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact token string for the `Authorization: Bearer` header
    pub access_token: String,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a successful `authenticate` call.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub principal: Principal,
    pub token: IssuedToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> TokenClaims {
        TokenClaims {
            sub: "usuario".to_string(),
            role: Role::User,
            integrity_tag: "tag".to_string(),
            iss: "rolegate-api".to_string(),
            aud: "rolegate-client".to_string(),
            jti: "abc".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_001_800,
        }
    }

    #[test]
    fn principal_from_claims_keeps_subject_and_role() {
        let principal = Principal::from(sample_claims());
        assert_eq!(principal, Principal::new("usuario", Role::User));
    }

    #[test]
    fn has_role_is_exact() {
        let admin = Principal::new("admin", Role::Admin);
        assert!(admin.has_role(Role::Admin));
        assert!(!admin.has_role(Role::User));
        assert!(admin.is_admin());

        let user = Principal::new("usuario", Role::User);
        assert!(user.has_role(Role::User));
        assert!(!user.has_role(Role::Admin));
    }

    #[test]
    fn claims_missing_integrity_tag_do_not_decode() {
        let json = r#"{"sub":"usuario","role":"user","iss":"i","aud":"a","jti":"j","iat":1,"exp":2}"#;
        assert!(serde_json::from_str::<TokenClaims>(json).is_err());
    }
}
