// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the HTTP surface. All types derive
//! `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Login**: credentials in, bearer token out
//! - **Protected**: envelopes returned by role-gated routes

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Principal, Role};
use crate::error::ApiError;

pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_PASSWORD_LEN: usize = 100;

// =============================================================================
// Login
// =============================================================================

/// Username and password, accepted as JSON or as a URL-encoded form.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account name (1-50 characters, surrounding whitespace ignored)
    pub username: String,
    /// Account password (1-100 characters)
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginRequest {
    /// Check field lengths and return the request with a trimmed username.
    pub fn validated(self) -> Result<Self, ApiError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ApiError::unprocessable(
                "Username cannot be empty or whitespace",
            ));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ApiError::unprocessable(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if self.password.is_empty() {
            return Err(ApiError::unprocessable("Password cannot be empty"));
        }
        if self.password.chars().count() > MAX_PASSWORD_LEN {
            return Err(ApiError::unprocessable(format!(
                "Password must be at most {MAX_PASSWORD_LEN} characters"
            )));
        }

        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// Bearer token response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Detailed login response. Failures are reported in-band.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TokenResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Principal>,
}

// =============================================================================
// Protected Routes
// =============================================================================

/// Response for the role-gated `/user` and `/admin` routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccessResponse {
    pub success: bool,
    pub message: String,
    pub data: AccountInfo,
}

impl AccessResponse {
    pub fn granted(message: impl Into<String>, principal: Principal) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: principal.into(),
        }
    }
}

/// Identity of the caller on a role-gated route.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountInfo {
    pub username: String,
    pub role: Role,
}

impl From<Principal> for AccountInfo {
    fn from(principal: Principal) -> Self {
        Self {
            username: principal.username,
            role: principal.role,
        }
    }
}

/// What the caller's role unlocks.
#[derive(Debug, Serialize, ToSchema)]
pub struct Permissions {
    pub can_access_user_resources: bool,
    pub can_access_admin_resources: bool,
    pub is_admin: bool,
    pub is_user: bool,
}

/// Profile of the current caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileData {
    pub username: String,
    pub role: Role,
    pub permissions: Permissions,
}

impl From<Principal> for ProfileData {
    fn from(principal: Principal) -> Self {
        let permissions = Permissions {
            can_access_user_resources: principal.has_role(Role::User),
            can_access_admin_resources: principal.has_role(Role::Admin),
            is_admin: principal.is_admin(),
            is_user: principal.role == Role::User,
        };
        Self {
            username: principal.username,
            role: principal.role,
            permissions,
        }
    }
}

/// Response for `/profile`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub data: ProfileData,
}
