#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use school_dashboard::auth::Authenticator;
use school_dashboard::config::StaffAccount;
use school_dashboard::db;
use school_dashboard::genai::TextGenerator;
use school_dashboard::models::Role;
use school_dashboard::state::AppState;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::Notify;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@school.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const TEACHER_USERNAME: &str = "mrs.karki";
pub const TEACHER_PASSWORD: &str = "teacher-pass";

/// A single connection keeps the in-memory database alive for the whole test.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    pool
}

pub fn staff_accounts() -> Vec<StaffAccount> {
    vec![
        StaffAccount {
            role: Role::Admin,
            username: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            name: "Principal".to_string(),
        },
        StaffAccount {
            role: Role::Teacher,
            username: TEACHER_USERNAME.to_string(),
            password: TEACHER_PASSWORD.to_string(),
            name: "Mrs. Karki".to_string(),
        },
    ]
}

pub async fn seeded_state(generator: Arc<dyn TextGenerator>) -> AppState {
    let pool = test_pool().await;
    db::seed::seed_defaults(&pool).await.expect("Failed to seed");
    AppState::new(pool, generator, Authenticator::new(staff_accounts()))
}

/// Echoes the prompt back and counts calls.
#[derive(Default)]
pub struct EchoGenerator {
    pub calls: AtomicUsize,
}

impl EchoGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        format!("generated: {}", prompt)
    }
}

/// Holds every call until `release` is notified.
#[derive(Default)]
pub struct GatedGenerator {
    pub calls: AtomicUsize,
    pub started: Notify,
    pub release: Notify,
}

impl GatedGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, prompt: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        format!("gated: {}", prompt)
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("Authorization", format!("Bearer {}", session));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, value)
}

pub async fn login(app: &Router, username: &str, password: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password, "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["session_id"]
        .as_str()
        .expect("session_id missing")
        .to_string()
}
