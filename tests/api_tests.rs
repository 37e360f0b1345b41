//! API tests driving the router in-process over an in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use lending_desk::{api, repository::MemoryStore, services::Services, AppConfig, AppState};

async fn app() -> Router {
    let config = AppConfig::default();
    let services = Services::new(Arc::new(MemoryStore::new()), &config)
        .await
        .expect("library should load");

    api::router(AppState {
        services: Arc::new(services),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn available(app: &Router, item_id: i32) -> i64 {
    let (_, body) = send(app, "GET", &format!("/api/v1/items/{}", item_id), None, None).await;
    body["available"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_catalog_listing() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/v1/items", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["title"], "The Great Gatsby");
    assert_eq!(items[2]["id"], 3);
    assert_eq!(items[2]["available"], 2);

    let (status, body) = send(&app, "GET", "/api/v1/items/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchItem");
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["message"], "Welcome alice!");
    assert_eq!(body["patron"]["id"], 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password.");
}

#[tokio::test]
async fn test_register_then_login() {
    let app = app().await;
    let register = json!({ "username": "carol", "password": "secret" });

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(register.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["patron"]["id"], 3);
    assert_eq!(body["message"], "User 'carol' registered successfully.");

    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(register)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists.");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({ "username": "", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    login(&app, "carol", "secret").await;
}

#[tokio::test]
async fn test_borrow_requires_login_and_selection() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        None,
        Some(json!({ "item_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "You must be logged in to borrow books.");

    let token = login(&app, "bob", "password456").await;
    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select a book to borrow.");

    assert_eq!(available(&app, 1).await, 5);
}

#[tokio::test]
async fn test_borrow_list_and_return() {
    let app = app().await;
    let token = login(&app, "alice", "password123").await;

    let (status, body) = send(&app, "GET", "/api/v1/loans", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You have not borrowed any books yet.");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({ "item_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book 'To Kill a Mockingbird' borrowed successfully!");
    assert_eq!(body["item"]["available"], 1);
    assert_eq!(body["due_label"], "2024-11-20");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({ "item_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["available"], 0);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({ "item_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Sorry, 'To Kill a Mockingbird' is not available.");

    let (_, body) = send(&app, "GET", "/api/v1/loans", Some(&token), None).await;
    assert_eq!(body["loans"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans/return",
        Some(&token),
        Some(json!({ "item_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book 'To Kill a Mockingbird' returned successfully!");
    assert_eq!(available(&app, 3).await, 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans/return",
        Some(&token),
        Some(json!({ "item_id": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This book is not in your borrowed list.");
    assert_eq!(available(&app, 5).await, 6);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = app().await;
    let token = login(&app, "alice", "password123").await;

    let (status, _) = send(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/v1/loans", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotLoggedIn");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans/return",
        Some(&token),
        Some(json!({ "item_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_body_is_no_selection() {
    let app = app().await;
    let token = login(&app, "alice", "password123").await;

    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "NoSelection");
    assert_eq!(body["message"], "Please select a book to borrow.");

    let (status, body) = send(&app, "POST", "/api/v1/loans/return", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "NoSelection");

    let (_, body) = send(&app, "GET", "/api/v1/loans", Some(&token), None).await;
    assert_eq!(body["loans"].as_array().unwrap().len(), 0);
}
