// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-gated endpoints.

use axum::Json;

use crate::auth::{AdminOnly, Auth, UserOnly};
use crate::models::{AccessResponse, ProfileResponse};

/// Resource reserved for the `user` role.
#[utoipa::path(
    get,
    path = "/user",
    tag = "Protected",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Access granted", body = AccessResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Role is not `user`")
    )
)]
pub async fn user_resource(UserOnly(principal): UserOnly) -> Json<AccessResponse> {
    Json(AccessResponse::granted(
        "User resource retrieved successfully",
        principal,
    ))
}

/// Resource reserved for the `admin` role.
#[utoipa::path(
    get,
    path = "/admin",
    tag = "Protected",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Access granted", body = AccessResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Role is not `admin`")
    )
)]
pub async fn admin_resource(AdminOnly(principal): AdminOnly) -> Json<AccessResponse> {
    Json(AccessResponse::granted(
        "Admin resource retrieved successfully",
        principal,
    ))
}

/// Identity and permissions of the current caller.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Protected",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn profile(Auth(principal): Auth) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        message: "User profile retrieved successfully".to_string(),
        data: principal.into(),
    })
}
