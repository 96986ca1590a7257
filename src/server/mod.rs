//! HTTP server exposing the issue API.
//!
//! Routes live under [`ISSUES_PREFIX`]; `/health` reports liveness.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, DEFAULT_ADDR};
use crate::error::{IssueError, Result};
use crate::service::IssueService;
use crate::storage::{IssueStore, JsonlStore};

pub use routes::HealthResponse;

/// Path prefix for the issue endpoints.
pub const ISSUES_PREFIX: &str = "/api/v1/issues";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable permissive CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            addr: config.addr,
            cors: config.cors,
        }
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    #[must_use]
    pub const fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    #[must_use]
    pub const fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Builds the server config.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or(DEFAULT_ADDR),
            cors: self.cors.unwrap_or(true),
        }
    }
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// The issue handler set.
    pub service: IssueService,
    /// Server start time.
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(service: IssueService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router over `store`.
pub fn router(store: Arc<dyn IssueStore>, cors: bool) -> Router {
    let state = Arc::new(AppState::new(IssueService::new(store)));
    let collection = get(routes::list_issues).post(routes::create_issue);
    let item = get(routes::get_issue)
        .put(routes::update_issue)
        .delete(routes::delete_issue);

    let mut router = Router::new()
        .route("/health", get(routes::health))
        .route(ISSUES_PREFIX, collection.clone())
        .route(&format!("{ISSUES_PREFIX}/"), collection)
        .route(&format!("{ISSUES_PREFIX}/{{issue_id}}"), item)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    store: Arc<dyn IssueStore>,
}

impl Server {
    /// Creates a server over an arbitrary store.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn IssueStore>) -> Self {
        Self { config, store }
    }

    /// Creates a server over the JSONL file named in `config`.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let store = Arc::new(JsonlStore::new(&config.data_path));
        Self::new(ServerConfig::from(config), store)
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self) -> Result<()> {
        let router = router(self.store, self.config.cors);

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;
        tracing::info!(addr = %self.config.addr, cors = self.config.cors, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| IssueError::Internal(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}
