#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use coffee_service::config::{
    CoffeeConfig, CoffeeSettings, MongoConfig, StorageBackend, StorageConfig,
};
use coffee_service::models::CategoryField;
use coffee_service::services::{CoffeeStore, InMemoryCoffeeStore};
use coffee_service::startup::{build_router, AppState, Application};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router over a fresh in-memory store.
pub fn memory_router() -> Router {
    router_with(Arc::new(InMemoryCoffeeStore::new()), CategoryField::Category)
}

pub fn router_with(store: Arc<dyn CoffeeStore>, category_field: CategoryField) -> Router {
    build_router(AppState::new(store, category_field))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }
}

pub async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn test_mongodb_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

/// The real binary wiring against a real MongoDB, on a random port with its
/// own database.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db_name: String,
}

/// Config for the Mongo backend against `uri`, bound to a random port.
pub fn mongo_config(uri: String, database: String) -> CoffeeConfig {
    CoffeeConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: Some(uri),
            user: None,
            password: None,
            cluster: "localhost".to_string(),
            database,
            collection: "coffee".to_string(),
            strict_api: false,
        },
        storage: StorageConfig {
            backend: StorageBackend::Mongo,
        },
        coffee: CoffeeSettings {
            legacy_category_field: false,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("coffee_test_{}", uuid::Uuid::new_v4().simple());
        Self::spawn_with(mongo_config(test_mongodb_uri(), db_name)).await
    }

    pub async fn spawn_with(config: CoffeeConfig) -> Self {
        let db_name = config.mongodb.database.clone();
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the default route
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db_name,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Drops the per-test database.
    pub async fn cleanup(&self) {
        if let Ok(client) = mongodb::Client::with_uri_str(test_mongodb_uri()).await {
            let _ = client.database(&self.db_name).drop(None).await;
        }
    }
}
