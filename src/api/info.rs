// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service description endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Role;

const SERVICE_NAME: &str = "Rolegate API";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where to find each part of the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointMap {
    pub docs: &'static str,
    pub openapi: &'static str,
    pub health: &'static str,
    pub auth: Vec<&'static str>,
    pub protected: Vec<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointMap,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

/// Token format and the checks applied to it.
#[derive(Debug, Serialize, ToSchema)]
pub struct SecurityInfo {
    pub authentication: &'static str,
    pub algorithm: &'static str,
    pub roles: Vec<Role>,
    pub features: Vec<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub api: ServiceInfo,
    pub security: SecurityInfo,
}

/// Service banner with an index of endpoints.
#[utoipa::path(
    get,
    path = "/",
    tag = "Info",
    responses(
        (status = 200, description = "Service banner", body = RootResponse)
    )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        version: SERVICE_VERSION,
        endpoints: EndpointMap {
            docs: "/docs",
            openapi: "/api-doc/openapi.json",
            health: "/health",
            auth: vec!["/auth/token", "/auth/token-json", "/auth/login"],
            protected: vec!["/user", "/admin", "/profile"],
        },
    })
}

/// Token format, roles, and protections in place.
#[utoipa::path(
    get,
    path = "/info",
    tag = "Info",
    responses(
        (status = 200, description = "Service details", body = InfoResponse)
    )
)]
pub async fn api_info() -> Json<InfoResponse> {
    Json(InfoResponse {
        api: ServiceInfo {
            name: SERVICE_NAME,
            version: SERVICE_VERSION,
            description: "Bearer token issuance with role-gated access",
        },
        security: SecurityInfo {
            authentication: "JWT Bearer Token",
            algorithm: "HS256",
            roles: vec![Role::User, Role::Admin],
            features: vec![
                "Password hashing with bcrypt",
                "Keyed role integrity tag",
                "Constant-cost login for unknown users",
                "Issuer, audience and expiry checks",
            ],
        },
    })
}
