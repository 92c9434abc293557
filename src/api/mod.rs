// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{Principal, Role},
    models::{
        AccessResponse, AccountInfo, LoginRequest, LoginResponse, Permissions, ProfileData,
        ProfileResponse, TokenResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod info;
pub mod protected;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(info::root))
        .route("/info", get(info::api_info))
        .route("/auth/token", post(auth::login_form))
        .route("/auth/token-json", post(auth::login_json))
        .route("/auth/login", post(auth::login_detailed))
        .route("/user", get(protected::user_resource))
        .route("/admin", get(protected::admin_resource))
        .route("/profile", get(protected::profile))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_form,
        auth::login_json,
        auth::login_detailed,
        protected::user_resource,
        protected::admin_resource,
        protected::profile,
        health::health,
        health::liveness,
        info::root,
        info::api_info
    ),
    components(
        schemas(
            LoginRequest,
            TokenResponse,
            LoginResponse,
            AccessResponse,
            AccountInfo,
            ProfileResponse,
            ProfileData,
            Permissions,
            Principal,
            Role,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            info::RootResponse,
            info::EndpointMap,
            info::InfoResponse,
            info::ServiceInfo,
            info::SecurityInfo
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Authentication", description = "Credential exchange for bearer tokens"),
        (name = "Protected", description = "Role-gated resources"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Info", description = "Service description")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_post(
                "/auth/token-json",
                serde_json::json!({ "username": username, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(test_state());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn json_login_returns_bearer_token() {
        let app = router(test_state());
        let response = app
            .oneshot(json_post(
                "/auth/token-json",
                serde_json::json!({ "username": "usuario", "password": "L0XuwPOdS5U" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["token_type"], "bearer");
        assert!(body["access_token"].as_str().unwrap().split('.').count() == 3);
    }

    #[tokio::test]
    async fn form_login_returns_bearer_token() {
        let app = router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=admin&password=JKSipm0YH"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["token_type"], "bearer");
    }

    #[tokio::test]
    async fn wrong_credentials_return_401() {
        let app = router(test_state());
        let response = app
            .oneshot(json_post(
                "/auth/token-json",
                serde_json::json!({ "username": "invalid", "password": "invalid" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Incorrect username or password");
    }

    #[tokio::test]
    async fn invalid_login_input_returns_422() {
        let app = router(test_state());
        for body in [
            serde_json::json!({ "username": "", "password": "" }),
            serde_json::json!({ "username": "   ", "password": "password" }),
            serde_json::json!({}),
        ] {
            let response = app
                .clone()
                .oneshot(json_post("/auth/token-json", body.clone()))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "body {body}"
            );
        }
    }

    #[tokio::test]
    async fn detailed_login_reports_outcome_in_body() {
        let app = router(test_state());

        let response = app
            .clone()
            .oneshot(json_post(
                "/auth/login",
                serde_json::json!({ "username": "usuario", "password": "L0XuwPOdS5U" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "usuario");
        assert_eq!(body["user"]["role"], "user");
        assert!(body["data"]["access_token"].is_string());

        let response = app
            .oneshot(json_post(
                "/auth/login",
                serde_json::json!({ "username": "usuario", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn user_token_reaches_user_route_but_not_admin_route() {
        let app = router(test_state());
        let token = login(&app, "usuario", "L0XuwPOdS5U").await;

        let response = app
            .clone()
            .oneshot(get_with_token("/user", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["username"], "usuario");

        let response = app
            .oneshot(get_with_token("/admin", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_token_reaches_admin_route() {
        let app = router(test_state());
        let token = login(&app, "admin", "JKSipm0YH").await;

        let response = app
            .oneshot(get_with_token("/admin", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["role"], "admin");
    }

    #[tokio::test]
    async fn profile_lists_permissions() {
        let app = router(test_state());
        let token = login(&app, "usuario", "L0XuwPOdS5U").await;

        let response = app
            .oneshot(get_with_token("/profile", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["username"], "usuario");
        assert_eq!(body["data"]["permissions"]["is_user"], true);
        assert_eq!(body["data"]["permissions"]["can_access_admin_resources"], false);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let app = router(test_state());
        let request = Request::builder().uri("/user").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn every_token_failure_looks_the_same_to_the_client() {
        let app = router(test_state());
        let token = login(&app, "usuario", "L0XuwPOdS5U").await;

        let parts: Vec<&str> = token.split('.').collect();
        let mut payload: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        payload["role"] = serde_json::json!("admin");
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(payload.to_string()),
            parts[2]
        );

        let mut bodies = Vec::new();
        for bad in ["invalid-token", tampered.as_str()] {
            let response = app
                .clone()
                .oneshot(get_with_token("/admin", bad))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            bodies.push(body_json(response).await);
        }
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[0]["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(test_state());
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["checks"]["token_keys"], "ok");
    }

    #[tokio::test]
    async fn root_and_info_describe_the_service() {
        let app = router(test_state());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(
            body["endpoints"]["protected"],
            serde_json::json!(["/user", "/admin", "/profile"])
        );

        let request = Request::builder().uri("/info").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["security"]["algorithm"], "HS256");
        assert_eq!(body["security"]["roles"], serde_json::json!(["user", "admin"]));
    }

    #[tokio::test]
    async fn lowercase_bearer_scheme_is_accepted() {
        let app = router(test_state());
        let token = login(&app, "usuario", "L0XuwPOdS5U").await;
        let request = Request::builder()
            .uri("/user")
            .header(header::AUTHORIZATION, format!("bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(test_state());
        let request = Request::builder()
            .uri("/health/live")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(doc.paths.paths.contains_key("/auth/token"));
    }
}
