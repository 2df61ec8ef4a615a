//! HTTP server for the catalog backend.
//!
//! Serves the public product feed, the session-gated mutation endpoints, and
//! the static storefront assets (including uploaded images).

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{CredentialVerifier, FileCredentials, Operator, SessionStore, SESSION_COOKIE};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::CatalogServer;
pub use state::AppState;
