use std::sync::Arc;

use catalog_service::CatalogService;

use crate::auth::{CredentialVerifier, SessionStore};
use crate::config::ServerConfig;

/// Shared handler state. Cloned per request; everything inside is `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub catalog: Arc<CatalogService>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        catalog: CatalogService,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let sessions = SessionStore::with_ttl(config.session_ttl());
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            credentials,
            sessions: Arc::new(sessions),
        }
    }
}
