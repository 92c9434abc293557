// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rolegate - Bearer Token Issuer and Role Gate
//!
//! Exchanges username/password credentials for short-lived HS256 bearer
//! tokens and gates protected routes on the `user` and `admin` roles. Each
//! token carries a keyed integrity tag binding the subject to its role, so
//! a role claim altered after issuance is rejected even if the token
//! signature were forged.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password verification, token issuance and validation
//! - `config` - Environment-driven settings
//! - `store` - Credential storage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod telemetry;
