// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::RejectionLogging;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub rejection_logging: RejectionLogging,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, rejection_logging: RejectionLogging) -> Self {
        Self {
            auth,
            rejection_logging,
        }
    }
}
