mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, send};

#[tokio::test]
async fn health_reports_ok_without_auth() {
    let app = build_test_app();
    let response = send(&app, "GET", "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store_healthy"], true);
}
