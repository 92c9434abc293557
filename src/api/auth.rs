// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoints.
//!
//! bcrypt verification is CPU-bound and runs on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form, Json,
};
use tracing::error;

use crate::{
    auth::{AuthError, AuthResult},
    error::ApiError,
    models::{LoginRequest, LoginResponse, TokenResponse},
    state::AppState,
};

/// Failure of a login request: bad input or an auth error.
#[derive(Debug)]
pub enum LoginError {
    Input(ApiError),
    Auth(AuthError),
}

impl From<ApiError> for LoginError {
    fn from(err: ApiError) -> Self {
        LoginError::Input(err)
    }
}

impl From<AuthError> for LoginError {
    fn from(err: AuthError) -> Self {
        LoginError::Auth(err)
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::Input(err) => err.into_response(),
            LoginError::Auth(err) => err.into_response(),
        }
    }
}

async fn authenticate(state: &AppState, request: LoginRequest) -> Result<AuthResult, LoginError> {
    let request = request.validated()?;
    let auth = Arc::clone(&state.auth);

    let result = tokio::task::spawn_blocking(move || {
        auth.authenticate(&request.username, &request.password)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Authentication worker failed");
        ApiError::internal("Authentication worker failed")
    })?;

    Ok(result?)
}

/// Exchange form-encoded credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "Authentication",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn login_form(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, LoginError> {
    let result = authenticate(&state, request).await?;
    Ok(Json(TokenResponse::bearer(result.token.access_token)))
}

/// Exchange JSON credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/token-json",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn login_json(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, LoginError> {
    let result = authenticate(&state, request).await?;
    Ok(Json(TokenResponse::bearer(result.token.access_token)))
}

/// Log in and receive the token together with the account details.
///
/// Wrong credentials are reported in the body with `success: false`.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login outcome", body = LoginResponse),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn login_detailed(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, LoginError> {
    match authenticate(&state, request).await {
        Ok(result) => Ok(Json(LoginResponse {
            success: true,
            message: "Authentication successful".to_string(),
            data: Some(TokenResponse::bearer(result.token.access_token)),
            user: Some(result.principal),
        })),
        Err(LoginError::Auth(AuthError::AuthFailed)) => Ok(Json(LoginResponse {
            success: false,
            message: "Authentication failed. Invalid credentials.".to_string(),
            data: None,
            user: None,
        })),
        Err(err) => Err(err),
    }
}
