//! Shared setup for the HTTP-level tests.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request},
    response::Response,
    Router,
};
use backend_lib::{config::Settings, router::create_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@airavat.in";
pub const ADMIN_PASSWORD: &str = "guard-post-7";

/// Settings with one configured admin email
pub fn test_settings() -> Settings {
    let mut settings = Settings::for_tests();
    settings.auth.admin_emails = vec![ADMIN_EMAIL.to_string()];
    settings
}

pub fn test_app(settings: Settings) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_settings(settings).unwrap());
    (create_router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn signup_body(email: &str, phone: &str, password: &str, confirm: &str) -> Value {
    serde_json::json!({
        "fullName": "Ravi Kumar",
        "email": email,
        "phone": phone,
        "password": password,
        "confirmPassword": confirm,
    })
}

/// Sign up the configured admin and return the signup token
pub async fn signup_admin(app: &Router) -> String {
    let body = signup_body(ADMIN_EMAIL, "+91 98765 43210", ADMIN_PASSWORD, ADMIN_PASSWORD);
    let response = send(app, post_json("/api/auth/signup", &body)).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
