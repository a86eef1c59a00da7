//! Common test utilities for HTTP tests
//!
//! Builds the full router over an in-memory repository so every endpoint can
//! be exercised without a database, and wraps request/response plumbing.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use taskflow_api::app::{build_router, AppState};
use taskflow_api::config::{ApiConfig, Config, DatabaseConfig};
use taskflow_shared::error::{StoreError, StoreResult};
use taskflow_shared::models::task::{
    GroupCount, GroupField, Task, TaskCountFilter, TaskFilter, TaskUpdate,
};
use taskflow_shared::models::user::User;
use taskflow_shared::repository::{MemoryRepository, Repository};
use tower::ServiceExt;

/// Test context holding a router over a fresh store
pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    /// Router over an empty in-memory store, any origin allowed
    pub fn new() -> Self {
        Self::with_origins(&["*"])
    }

    /// Router over an empty in-memory store with the given CORS origins
    pub fn with_origins(origins: &[&str]) -> Self {
        Self::with_repository(Arc::new(MemoryRepository::new()), origins)
    }

    pub fn with_repository(repo: Arc<dyn Repository>, origins: &[&str]) -> Self {
        let state = AppState::new(repo, test_config(origins));
        Self {
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// An empty body is returned as `Value::Null`.
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                panic!("non-JSON body ({}): {}", e, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }

    /// Creates a task and returns its id
    pub async fn create_task(&self, body: Value) -> String {
        let (status, task) = self.post("/api/tasks", body).await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", task);
        tick().await;
        task["id"].as_str().unwrap().to_string()
    }
}

pub fn test_config(origins: &[&str]) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            log_json: false,
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/taskflow_test".to_string(),
            name: None,
            max_connections: 1,
        },
    }
}

/// Keeps creation timestamps of consecutive requests distinct
pub async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

/// Store whose pool never hands out a connection
pub struct UnavailableRepository;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl Repository for UnavailableRepository {
    async fn insert_task(&self, _task: &Task) -> StoreResult<()> {
        unavailable()
    }

    async fn find_tasks(&self, _filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        unavailable()
    }

    async fn find_task_by_id(&self, _id: &str) -> StoreResult<Option<Task>> {
        unavailable()
    }

    async fn update_task(&self, _id: &str, _update: &TaskUpdate) -> StoreResult<Task> {
        unavailable()
    }

    async fn delete_task(&self, _id: &str) -> StoreResult<()> {
        unavailable()
    }

    async fn insert_user(&self, _user: &User) -> StoreResult<()> {
        unavailable()
    }

    async fn find_all_users(&self) -> StoreResult<Vec<User>> {
        unavailable()
    }

    async fn count_tasks(&self, _filter: &TaskCountFilter) -> StoreResult<u64> {
        unavailable()
    }

    async fn group_task_counts(&self, _field: GroupField) -> StoreResult<Vec<GroupCount>> {
        unavailable()
    }

    async fn ping(&self) -> StoreResult<()> {
        unavailable()
    }
}
