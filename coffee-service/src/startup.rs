//! Application startup and lifecycle management.
//!
//! The storage handle is created once in [`Application::build`], shared with
//! every handler through [`AppState`], and closed after the server drains.

use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{http_trace_layer, request_id_middleware},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{CoffeeConfig, StorageBackend};
use crate::handlers::{
    create_coffee, delete_coffee, get_coffee, health_check, index, list_coffees,
    metrics_endpoint, readiness_check, update_coffee,
};
use crate::models::CategoryField;
use crate::services::{CoffeeDb, CoffeeStore, InMemoryCoffeeStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CoffeeStore>,
    pub category_field: CategoryField,
}

impl AppState {
    pub fn new(store: Arc<dyn CoffeeStore>, category_field: CategoryField) -> Self {
        Self {
            store,
            category_field,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/coffee", get(list_coffees).post(create_coffee))
        .route(
            "/coffee/:id",
            get(get_coffee).put(update_coffee).delete(delete_coffee),
        )
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// The listener is bound before storage is touched. The startup ping runs
    /// in the background and a failure is only logged: routes are served
    /// regardless and storage calls fail per request until the database is
    /// reachable.
    pub async fn build(config: CoffeeConfig) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let store: Arc<dyn CoffeeStore> = match config.storage.backend {
            StorageBackend::Mongo => {
                let db = CoffeeDb::connect(&config.mongodb).await?;
                let probe = db.clone();
                tokio::spawn(async move {
                    match probe.health_check().await {
                        Ok(()) => {
                            tracing::info!("Pinged MongoDB deployment. Connection successful!")
                        }
                        Err(e) => tracing::error!(
                            error = %e,
                            "Error connecting to MongoDB; serving anyway"
                        ),
                    }
                });
                Arc::new(db)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory coffee store; records are lost on restart");
                Arc::new(InMemoryCoffeeStore::new())
            }
        };

        let category_field = CategoryField::from_legacy_flag(config.coffee.legacy_category_field);
        if category_field == CategoryField::Legacy {
            tracing::warn!(
                "COFFEE_LEGACY_CATEGORY_FIELD is set: updates write `category` as `categorya`"
            );
        }

        Ok(Self {
            port,
            listener,
            state: AppState::new(store, category_field),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then close the storage handle.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let store = self.state.store.clone();
        let router = build_router(self.state);

        tracing::info!("Coffee server is running on port: {}", self.port);
        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        store.shutdown().await;

        result.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            e
        })
    }
}
