//! Common test utilities for integration tests
//!
//! Each `TestApp` owns a fresh in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use nutrition_planner_backend::{config::AppConfig, routes, state::AppState};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::in_memory(config);
        Self {
            app: routes::create_router(state),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body)).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("PATCH", path, Some(body)).await
    }

    /// Create a profile and return its id
    pub async fn create_profile(&self) -> String {
        let (status, body) = self.post("/api/v1/profiles", "").await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    async fn send(&self, method: &str, path: &str, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

/// Parse a response body as JSON
pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}
