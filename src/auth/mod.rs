// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Issues and validates bearer tokens for the two-role (user/admin) API.
//!
//! ## Auth Flow
//!
//! 1. Client posts username and password to `/auth/token`
//! 2. Server:
//!    - Verifies the password with bcrypt (unknown users hit a dummy hash)
//!    - Computes the role integrity tag over `(username, role)`
//!    - Signs an HS256 token with `iss`, `aud`, `jti`, `iat`, `exp`
//! 3. Client sends `Authorization: Bearer <token>`
//! 4. Server verifies signature, expiry, issuer/audience, then the
//!    integrity tag, and checks the route's required role
//!
//! ## Security
//!
//! - Unknown usernames cost the same bcrypt work as wrong passwords
//! - Integrity tags are compared without early exit
//! - Clients get one generic 401 for every token failure; the precise
//!   reason only reaches the server log

pub mod claims;
pub mod error;
pub mod extractor;
pub mod integrity;
pub mod issuer;
pub mod password;
pub mod roles;
pub mod service;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::{AuthResult, IssuedToken, Principal, TokenClaims};
pub use error::{AuthError, CredentialError, IssuanceError};
pub use extractor::{AdminOnly, Auth, UserOnly};
pub use integrity::RoleIntegritySigner;
pub use issuer::TokenIssuer;
pub use password::PasswordVerifier;
pub use roles::Role;
pub use service::AuthService;
pub use validator::TokenValidator;
