// Shared helpers for the in-process integration tests. Each test binary
// uses a subset of these.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use coffeeshop_api::auth::{self, Claims};

pub const TEST_ISSUER: &str = "https://coffeeshop.test/";
pub const TEST_AUDIENCE: &str = "drinks";
pub const TEST_SECRET: &str = "integration-test-secret";

/// Pins the auth config before the process-wide singleton is first read, so
/// tests do not depend on the host environment.
pub fn bootstrap_env() {
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    std::env::set_var("JWT_ISSUER", TEST_ISSUER);
    std::env::set_var("JWT_AUDIENCE", TEST_AUDIENCE);
}

pub fn app() -> Router {
    bootstrap_env();
    coffeeshop_api::app()
}

/// Signs a token carrying the given permission strings.
pub fn token(permissions: &[&str]) -> String {
    bootstrap_env();
    let claims = Claims::new(
        "auth0|tester".to_string(),
        permissions.iter().map(|p| p.to_string()).collect(),
    );
    auth::issue_token(&claims).expect("sign token")
}

pub fn sign(claims: &Claims) -> String {
    bootstrap_env();
    auth::issue_token(claims).expect("sign token")
}

pub fn now_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as i64
}

/// A well-formed claim set for the test issuer/audience, expiring in an hour.
pub fn base_claims(permissions: Option<Vec<String>>) -> Claims {
    Claims {
        iss: TEST_ISSUER.to_string(),
        sub: "auth0|tester".to_string(),
        aud: TEST_AUDIENCE.to_string(),
        iat: now_epoch(),
        exp: now_epoch() + 3600,
        permissions,
    }
}

pub fn request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send(req: Request<Body>) -> Response {
    app().oneshot(req).await.expect("router is infallible")
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Asserts the flat failure envelope: `{success: false, error: <status>}`.
pub async fn assert_error_envelope(response: Response, expected: u16) -> serde_json::Value {
    assert_eq!(response.status().as_u16(), expected);
    let body = json_body(response).await;
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"], serde_json::json!(expected));
    assert!(body["message"].is_string(), "missing message: {}", body);
    body
}
