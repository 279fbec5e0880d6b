#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use costume_api::auth::jwt::{generate_access_token, JwtConfig};
use costume_api::config::ServerConfig;
use costume_api::router::build_app_router;
use costume_api::state::AppState;
use costume_core::types::{new_id, UserId};
use costume_db::MemoryStore;
use costume_engine::Engine;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The application over a fresh in-memory store. Cloning the returned
/// router shares the store, so one test can issue several requests.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState {
        engine: Arc::new(Engine::new(Arc::new(MemoryStore::new()))),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A new user and a valid bearer token for them.
pub fn login() -> (UserId, String) {
    let user = new_id();
    let token = generate_access_token(user, &test_config().jwt).expect("token");
    (user, token)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a request and assert on the status before returning the body.
pub async fn expect(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
    status: StatusCode,
) -> serde_json::Value {
    let response = send(app, method, uri, Some(token), body).await;
    assert_eq!(response.status(), status, "{method} {uri}");
    body_json(response).await
}
