//! HTTP-level checks against the real router. The database is disconnected,
//! so only paths that resolve before the store is touched are exercised.

use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use yamdb_api::infra::mail::EmailSender;
use yamdb_api::router::build_router;
use yamdb_api::state::AppState;
use yamdb_core::middleware::REQUEST_ID_HEADER;

use crate::helpers::TEST_JWT_SECRET;

fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        mailer: EmailSender::console("noreply@yamdb.local"),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
        confirmation_code_len: 12,
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_answer_healthz() {
    let response = server().get("/healthz").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = server().get("/readyz").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_stamp_request_id() {
    let response = server().get("/healthz").await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn should_require_signup_fields() {
    let response = server().post("/auth/signup").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_ERROR");
    assert_eq!(body["username"], "this field is required");
    assert_eq!(body["email"], "this field is required");
}

#[tokio::test]
async fn should_require_confirmation_code() {
    let response = server()
        .post("/auth/token")
        .json(&json!({ "username": "bob" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["confirmation_code"], "this field is required");
}

#[tokio::test]
async fn should_reject_malformed_body() {
    let response = server().post("/auth/signup").text("{").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn should_deny_anonymous_writes_before_lookup() {
    let server = server();

    let response = server
        .post("/categories")
        .json(&json!({ "name": "Films", "slug": "films" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server.delete("/genres/drama").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .patch("/titles/1")
        .json(&json!({ "name": "Renamed" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/titles/1/reviews")
        .json(&json!({ "text": "Great", "score": 9 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server.delete("/titles/1/reviews/1/comments/1").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_deny_anonymous_access_to_users() {
    let server = server();

    let response = server.get("/users").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "UNAUTHENTICATED");

    let response = server.get("/users/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_invalid_bearer_token() {
    let response = server()
        .get("/titles")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_non_bearer_authorization() {
    let response = server()
        .get("/titles")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic Ym9iOnNlY3JldA=="))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_non_numeric_title_id() {
    let response = server().get("/titles/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn should_reject_undecodable_path_segment() {
    let server = server();

    for path in ["/users/%FF", "/categories/%FF", "/genres/%FF"] {
        let response = if path.starts_with("/users") {
            server.get(path).await
        } else {
            server.delete(path).await
        };
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["kind"], "MALFORMED_REQUEST", "{path}");
    }
}
