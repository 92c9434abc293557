// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication and authorization failures.
///
/// Every variant is terminal. The precise kind is meant for server logs;
/// the HTTP response collapses all token problems into one generic
/// rejection so callers cannot probe the signature or integrity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    InvalidAuthHeader,
    /// Username or password did not match
    AuthFailed,
    /// Token could not be parsed
    MalformedToken,
    /// Token signature is invalid or uses an unexpected algorithm
    BadSignature,
    /// Token has expired
    Expired,
    /// Token issuer or audience differs from configuration
    BadAudienceOrIssuer,
    /// Integrity tag does not match the subject and role
    RoleTampering,
    /// Valid token, but the role does not match the route
    InsufficientRole,
    /// Internal error (token signing, worker failure)
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Precise error code for internal logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::AuthFailed => "invalid_credentials",
            AuthError::MalformedToken => "malformed_token",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "token_expired",
            AuthError::BadAudienceOrIssuer => "bad_audience_or_issuer",
            AuthError::RoleTampering => "role_tampering",
            AuthError::InsufficientRole => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Body sent to the client. Never distinguishes token failure kinds.
    fn public_body(&self) -> AuthErrorBody {
        let (error, error_code) = match self {
            AuthError::AuthFailed => ("Incorrect username or password", "invalid_credentials"),
            AuthError::InsufficientRole => (
                "Insufficient permissions for this operation",
                "insufficient_permissions",
            ),
            AuthError::Internal(_) => ("Internal authentication error", "internal_error"),
            _ => ("Unauthorized", "unauthorized"),
        };
        AuthErrorBody {
            error: error.to_string(),
            error_code: error_code.to_string(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::AuthFailed => write!(f, "Incorrect username or password"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::BadSignature => write!(f, "Token signature is invalid"),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::BadAudienceOrIssuer => write!(f, "Token issuer or audience is invalid"),
            AuthError::RoleTampering => write!(f, "Token role integrity check failed"),
            AuthError::InsufficientRole => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.public_body())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Failure to produce a signed token.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("system random generator unavailable")]
    Entropy,
}

/// Failure while preparing password hashes.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("system random generator unavailable")]
    Entropy,

    #[error("duplicate username: {0}")]
    DuplicateUsername(String),
}
