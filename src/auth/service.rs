// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication service: the capability handed to the routing layer.
//!
//! ```rust,ignore
//! let result = service.authenticate("usuario", "L0XuwPOdS5U")?;
//! let principal = service.authorize(&result.token.access_token, Role::User)?;
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use super::claims::{AuthResult, Principal};
use super::error::{AuthError, CredentialError};
use super::integrity::RoleIntegritySigner;
use super::issuer::TokenIssuer;
use super::password::PasswordVerifier;
use super::roles::Role;
use super::validator::TokenValidator;
use crate::config::AuthSettings;
use crate::store::CredentialStore;

pub struct AuthService {
    verifier: PasswordVerifier,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl AuthService {
    /// Wire verifier, issuer, and validator from immutable settings.
    pub fn new(
        settings: &AuthSettings,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, CredentialError> {
        let signer = match &settings.integrity_secret {
            Some(secret) => RoleIntegritySigner::new(secret.clone()),
            None => RoleIntegritySigner::derived_from(&settings.signing_secret),
        };

        Ok(Self {
            verifier: PasswordVerifier::new(store, settings.bcrypt_cost)?,
            issuer: TokenIssuer::new(settings, signer.clone()),
            validator: TokenValidator::new(settings, signer),
        })
    }

    /// Verify credentials and issue a token.
    ///
    /// Runs a full bcrypt verification; call from a blocking context.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthResult, AuthError> {
        let Some(principal) = self.verifier.verify_principal(username, password) else {
            warn!(%username, "Authentication failed");
            return Err(AuthError::AuthFailed);
        };

        let token = self.issuer.issue(&principal).map_err(|e| {
            warn!(error = %e, "Token issuance failed");
            AuthError::Internal(e.to_string())
        })?;

        info!(
            username = %principal.username,
            role = %principal.role,
            token_id = %token.token_id,
            expires_at = %token.expires_at,
            "Issued access token"
        );

        Ok(AuthResult { principal, token })
    }

    /// Validate a token without a role requirement.
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        self.validator.validate(token)
    }

    /// Validate a token and require an exact role match.
    ///
    /// A valid token with another role yields `InsufficientRole`, never one
    /// of the validator errors.
    pub fn authorize(&self, token: &str, required: Role) -> Result<Principal, AuthError> {
        let principal = self.validator.validate(token)?;
        if !principal.has_role(required) {
            return Err(AuthError::InsufficientRole);
        }
        Ok(principal)
    }

    /// Issue and validate a probe token. False means the configured keys
    /// cannot round-trip a token.
    pub fn self_check(&self) -> bool {
        let probe = Principal::new("health-probe", Role::User);
        self.issuer
            .issue(&probe)
            .ok()
            .and_then(|token| self.validator.validate(&token.access_token).ok())
            .is_some_and(|principal| principal == probe)
    }
}
