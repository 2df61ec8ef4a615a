use std::sync::Arc;

use catalog_assets::AssetStore;
use catalog_service::{CatalogService, ServiceError};
use catalog_store::JsonFileStore;
use tokio::net::TcpListener;

use crate::auth::FileCredentials;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Catalog HTTP server.
pub struct CatalogServer {
    state: AppState,
}

impl CatalogServer {
    /// Prepare storage and credentials for `config`.
    ///
    /// Creates the product document (as an empty collection) and the upload
    /// directory if they do not exist yet.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = JsonFileStore::open_or_init(&config.products_path).map_err(ServiceError::from)?;
        let assets = AssetStore::open(&config.public_dir, &config.uploads_dir)
            .map_err(ServiceError::from)?;
        let credentials = FileCredentials::load(&config.users_path)?;
        let catalog = CatalogService::new(Arc::new(store), Arc::new(assets));
        Ok(Self::with_state(AppState::new(config, catalog, Arc::new(credentials))))
    }

    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.state.config.bind_addr;
        let app = self.router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("catalog server listening on {addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
