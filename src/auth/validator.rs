// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token validation.
//!
//! ## Checks, in order
//!
//! 1. **Parse** - structure, base64, JSON, known role → `MalformedToken`
//! 2. **Signature** - HS256 MAC under the signing key; any other `alg` is
//!    treated as a forgery attempt → `BadSignature`
//! 3. **Expiry** - `now >= exp + leeway` → `Expired`
//! 4. **Issuer / audience** - exact match with configuration →
//!    `BadAudienceOrIssuer`
//! 5. **Role integrity** - recomputed tag over `(sub, role)` →
//!    `RoleTampering`
//!
//! The first failing check decides the error. `jsonwebtoken` verifies the
//! signature before it decodes the claims, so an edited payload with a
//! stale signature surfaces as `BadSignature` rather than as a parse error.
//! Expiry and claim checks are done here rather than by `jsonwebtoken` so
//! the boundary is sub-second exact and the order above holds.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::claims::{Principal, TokenClaims};
use super::error::AuthError;
use super::integrity::RoleIntegritySigner;
use crate::config::AuthSettings;

pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    signer: RoleIntegritySigner,
    issuer: String,
    audience: String,
    leeway: TimeDelta,
}

impl TokenValidator {
    pub fn new(settings: &AuthSettings, signer: RoleIntegritySigner) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(&settings.signing_secret),
            validation,
            signer,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            // Config rejects leeways beyond TimeDelta; saturate rather than drop them.
            leeway: TimeDelta::from_std(settings.leeway).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Validate `token` against the current time.
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthError> {
        let claims = self.verify_signature(token)?;
        self.check_expiry(&claims, now)?;
        self.check_issuer_and_audience(&claims)?;

        if !self
            .signer
            .check(&claims.sub, claims.role, &claims.integrity_tag)
        {
            return Err(AuthError::RoleTampering);
        }

        Ok(claims.into())
    }

    fn verify_signature(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::BadSignature
                }
                _ => AuthError::MalformedToken,
            })
    }

    fn check_expiry(&self, claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::MalformedToken)?;
        let deadline = expires_at
            .checked_add_signed(self.leeway)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        if now >= deadline {
            return Err(AuthError::Expired);
        }
        Ok(())
    }

    fn check_issuer_and_audience(&self, claims: &TokenClaims) -> Result<(), AuthError> {
        if claims.iss != self.issuer || claims.aud != self.audience {
            return Err(AuthError::BadAudienceOrIssuer);
        }
        Ok(())
    }
}
