// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;

use super::AuthService;
use crate::config::AuthSettings;
use crate::state::AppState;
use crate::store::InMemoryCredentialStore;

pub const SIGNING_SECRET: &str = "test-signing-secret-0123456789abcdef";
pub const INTEGRITY_SECRET: &str = "test-integrity-secret-0123456789abcd";

/// Lowest bcrypt cost, so tests stay fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_settings() -> AuthSettings {
    AuthSettings::new(SIGNING_SECRET)
        .with_integrity_secret(INTEGRITY_SECRET)
        .with_bcrypt_cost(TEST_BCRYPT_COST)
}

pub fn test_service() -> AuthService {
    let settings = test_settings();
    let store = InMemoryCredentialStore::with_default_accounts(settings.bcrypt_cost)
        .expect("seed test accounts");
    AuthService::new(&settings, Arc::new(store)).expect("build auth service")
}

pub fn test_state() -> AppState {
    AppState::new(Arc::new(test_service()), test_settings().rejection_logging)
}
