//! Authentication API integration tests
//!
//! Tests for register, login, me, websocket-token and logout.

use super::call;
use crate::common::{create_test_user, test_state};
use axum::http::{header, Method, Request, StatusCode};
use gamechat::backend::server::create_app_with_state;
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_success() {
    let app = create_app_with_state(test_state());

    let response = call(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "alice@example.com",
            "password": "password123",
            "displayName": "Alice"
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body.get("userId").is_some());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_app_with_state(test_state());
    let body = json!({ "email": "alice@example.com", "password": "password123" });

    let first = call(&app, Method::POST, "/auth/register", None, Some(body.clone())).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = call(&app, Method::POST, "/auth/register", None, Some(body)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_short_password() {
    let app = create_app_with_state(test_state());
    let response = call(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "alice@example.com", "password": "abc" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], 400);
}

#[tokio::test]
async fn test_login_sets_cookie() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    let response = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": user.password })),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["displayName"], "Alice");
    assert_eq!(response.body["userId"], user.id.to_string());

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("authToken="));
    assert_contains!(cookie, "HttpOnly");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    let response = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "not-the-password" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    let response = call(&app, Method::GET, "/auth/me", Some(&user.token), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userId"], user.id.to_string());
    assert_eq!(response.body["authenticated"], true);
}

#[tokio::test]
async fn test_me_with_cookie() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    let request = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, format!("theme=dark; authToken={}", user.token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_credential() {
    let app = create_app_with_state(test_state());

    let missing = call(&app, Method::GET, "/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let forged = call(&app, Method::GET, "/auth/me", Some("not.a.jwt"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_websocket_token_is_valid() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state.clone());

    let response = call(&app, Method::GET, "/auth/websocket-token", Some(&user.token), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let token = response.body["token"].as_str().unwrap();
    let identity = assert_ok!(state.tokens.verify(Some(token)));
    assert_eq!(identity.user_id, user.id);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = create_app_with_state(test_state());

    let response = call(&app, Method::POST, "/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert_contains!(cookie, "Max-Age=0");
}

#[tokio::test]
async fn test_health_and_fallback() {
    let app = create_app_with_state(test_state());

    let health = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!({ "status": "ok", "connections": 0, "rooms": 0 }));

    let missing = call(&app, Method::GET, "/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
