// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated principals.
//!
//! Every principal comes from a token checked by the validator. Use `Auth`
//! in handlers that accept any valid token, and `UserOnly` or
//! `AdminOnly` for role-gated routes:
//!
//! ```rust,ignore
//! async fn admin_handler(AdminOnly(principal): AdminOnly) -> impl IntoResponse {
//!     // principal.role == Role::Admin
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{AuthError, Principal, Role};
use crate::config::RejectionLogging;
use crate::state::AppState;

/// Extractor for any caller holding a valid token.
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let result = bearer_token(parts).and_then(|token| state.auth.validate(token));
        result
            .map(Auth)
            .map_err(|e| log_rejection(e, state.rejection_logging))
    }
}

/// Extractor that requires the `user` role.
pub struct UserOnly(pub Principal);

impl FromRequestParts<AppState> for UserOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::User).await.map(UserOnly)
    }
}

/// Extractor that requires the `admin` role.
pub struct AdminOnly(pub Principal);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(AdminOnly)
    }
}

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    required: Role,
) -> Result<Principal, AuthError> {
    let Auth(principal) = Auth::from_request_parts(parts, state).await?;

    if !principal.has_role(required) {
        warn!(
            username = %principal.username,
            role = %principal.role,
            required = %required,
            "Role mismatch"
        );
        return Err(AuthError::InsufficientRole);
    }

    Ok(principal)
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    // Auth schemes are case-insensitive (RFC 7235).
    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }
    let token = token.trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

fn log_rejection(err: AuthError, logging: RejectionLogging) -> AuthError {
    match logging {
        RejectionLogging::Detailed => warn!(reason = err.error_code(), "Rejected bearer token"),
        RejectionLogging::Generic => warn!("Rejected bearer token"),
    }
    err
}
