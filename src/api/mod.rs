// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Body, middleware, routing::post, Router};
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

use crate::{auth::require_bearer, error::ApiError, state::AppState};

pub mod auth;
pub mod sum;

/// Prefix of every gated route.
pub const API_PREFIX: &str = "/sumapi/v1";

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth", post(auth::issue_token))
        .route("/sum", post(sum::compute_sum))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);

    Router::new()
        // `nest` leaves the bare trailing-slash path unmatched.
        .route_service(
            &format!("{API_PREFIX}/"),
            v1_routes.clone().into_service::<Body>(),
        )
        .nest(API_PREFIX, v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

#[derive(OpenApi)]
#[openapi(
    paths(auth::issue_token, sum::compute_sum),
    components(
        schemas(
            auth::AuthRequest,
            auth::AuthResponse,
            sum::SumRequest,
            sum::SumResponse,
            crate::error::ErrorBody
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Access token issuance"),
        (name = "Sum", description = "Digest over JSON numbers")
    )
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SUM_FIXTURE: &str = r#"{"data1":[1,2,3,4],"data2":{"a":6,"b":4},"data3":[[[2]]],"data4":{"a":{"b":4},"c":-2},"data5":{"a":[-1,1,"dark"]},"data6":[-1,{"a":1,"b":"light"}],"data7":[],"data8":{}}"#;

    fn app() -> Router {
        router(AppState::new(Config::default()))
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn post_with_token(uri: &str, token: &str, body: impl Into<Body>) -> Request<Body> {
        let mut request = post(uri, body);
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        request
    }

    async fn login(app: Router) -> String {
        let response = send(
            app,
            post("/sumapi/v1/auth", r#"{"username":"test","password":"test"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let _ = app().into_make_service();
    }

    #[tokio::test]
    async fn auth_issues_token() {
        let response = send(
            app(),
            post("/sumapi/v1/auth", r#"{"username":"test","password":"test"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["expires_in"], 3600);
    }

    #[tokio::test]
    async fn auth_reports_configured_expiry() {
        let mut config = Config::default();
        config.token.expires_in = std::time::Duration::from_secs(5 * 60);
        let response = send(
            router(AppState::new(config)),
            post("/sumapi/v1/auth", r#"{"username":"u","password":"p"}"#),
        )
        .await;
        assert_eq!(json_body(response).await["expires_in"], 300);
    }

    #[tokio::test]
    async fn auth_rejects_empty_credentials() {
        for body in [
            r#"{"username":"","password":""}"#,
            r#"{"username":"test","password":""}"#,
            r#"{"username":"","password":"test"}"#,
            r#"{}"#,
            "null",
            r#"{"Username":"test","Password":"test"}"#,
        ] {
            let response = send(app(), post("/sumapi/v1/auth", body)).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "body: {body}");
            assert_eq!(json_body(response).await["code"], "FORBIDDEN");
        }
    }

    #[tokio::test]
    async fn auth_undecodable_body_is_internal_error() {
        let response = send(app(), post("/sumapi/v1/auth", "asdf")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["http_status"], 500);
        assert_eq!(body["desc"], "internal error");
    }

    #[tokio::test]
    async fn auth_oversized_body_is_internal_error() {
        let mut config = Config::default();
        config.max_body_bytes = 8;
        let response = send(
            router(AppState::new(config)),
            post("/sumapi/v1/auth", r#"{"username":"test","password":"test"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn auth_with_bad_secret_is_internal_error() {
        let mut config = Config::default();
        config.token.secret = "%%%".to_string();
        let response = send(
            router(AppState::new(config)),
            post("/sumapi/v1/auth", r#"{"username":"test","password":"test"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn sum_with_valid_token() {
        let token = login(app()).await;
        let response = send(app(), post_with_token("/sumapi/v1/sum", &token, SUM_FIXTURE)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["sum"], 24);
        assert_eq!(
            body["sha256"],
            "c2356069e9d1e79ca924378153cfbbfb4d4416b1f99d41a2940bfdb66c5319db"
        );
    }

    #[tokio::test]
    async fn sum_accepts_top_level_array() {
        let token = login(app()).await;
        let response = send(app(), post_with_token("/sumapi/v1/sum", &token, "[1, [2, 3.9]]")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["sum"], 6);
    }

    #[tokio::test]
    async fn sum_rejects_invalid_json() {
        let token = login(app()).await;
        let response = send(app(), post_with_token("/sumapi/v1/sum", &token, "asdf")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body, json!({"http_status": 400, "code": "BAD REQUEST", "desc": ""}));
    }

    #[tokio::test]
    async fn sum_without_header_is_unauthorized() {
        let request = Request::builder()
            .method("GET")
            .uri("/sumapi/v1/sum")
            .body(Body::empty())
            .unwrap();
        let response = send(app(), request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn non_bearer_header_is_unauthorized() {
        let mut request = post("/sumapi/v1/sum", SUM_FIXTURE);
        request.headers_mut().insert(
            header::AUTHORIZATION,
            "Basic dGVzdDp0ZXN0".parse().unwrap(),
        );
        let response = send(app(), request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected() {
        let response = send(
            app(),
            post_with_token("/sumapi/v1/sum", "not-a-token", SUM_FIXTURE),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
        assert_eq!(json_body(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let mut config = Config::default();
        config.token.secret = "b3RoZXIta2V5".to_string();
        let foreign = login(router(AppState::new(config))).await;

        let response = send(app(), post_with_token("/sumapi/v1/sum", &foreign, SUM_FIXTURE)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn token_for_other_audience_is_rejected() {
        let mut config = Config::default();
        config.token.audience = "staging".to_string();
        let foreign = login(router(AppState::new(config))).await;

        let response = send(app(), post_with_token("/sumapi/v1/sum", &foreign, SUM_FIXTURE)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn unknown_route_requires_auth_first() {
        let request = Request::builder()
            .uri("/sumapi/v1/test")
            .body(Body::empty())
            .unwrap();
        let response = send(app(), request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn prefix_with_trailing_slash_is_gated() {
        let response = send(app(), post("/sumapi/v1/", "{}")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(
            json_body(response).await,
            json!({"http_status": 401, "code": "UNAUTHORIZED", "desc": ""})
        );
    }

    #[tokio::test]
    async fn prefix_with_trailing_slash_and_token_is_not_found() {
        let token = login(app()).await;
        let response = send(app(), post_with_token("/sumapi/v1/", &token, "{}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_route_with_token_is_not_found() {
        let token = login(app()).await;
        let request = Request::builder()
            .uri("/sumapi/v1/test")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = send(app(), request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["desc"], "not found");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let request = Request::builder()
            .uri("/api-doc/openapi.json")
            .body(Body::empty())
            .unwrap();
        let response = send(app(), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json_body(response).await;
        assert!(doc["paths"]["/sumapi/v1/auth"]["post"].is_object());
        assert!(doc["paths"]["/sumapi/v1/sum"]["post"].is_object());
    }
}
