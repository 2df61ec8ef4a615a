//! The session gate in front of catalog mutations.
//!
//! An operator logs in with a username and password checked against a
//! [`CredentialVerifier`]; success creates an in-memory session keyed by a
//! random token carried in an `HttpOnly` cookie. Handlers that require a
//! login take an [`Operator`] argument, which rejects the request with 401
//! before any store access when no live session is presented.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use catalog_types::Credential;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "catalog.sid";

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if the pair identifies an operator.
    async fn verify(&self, username: &str, password: &str) -> ServerResult<bool>;
}

/// Credentials read once from a JSON file.
///
/// The file is a JSON array of `{"username", "password"}` objects; passwords
/// are compared in plaintext.
#[derive(Debug, Default)]
pub struct FileCredentials {
    credentials: Vec<Credential>,
}

impl FileCredentials {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// Read the credentials file. A missing file yields no operators.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "credentials file missing; all logins will fail");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let credentials: Vec<Credential> = serde_json::from_slice(&bytes).map_err(|e| {
            ServerError::Config(format!("invalid credentials file {}: {e}", path.display()))
        })?;
        tracing::info!(operators = credentials.len(), "loaded credentials");
        Ok(Self::new(credentials))
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for FileCredentials {
    async fn verify(&self, username: &str, password: &str) -> ServerResult<bool> {
        Ok(self.credentials.iter().any(|c| c.matches(username, password)))
    }
}

/// A logged-in operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator {
    pub username: String,
}

/// How long a session stays valid after login when no lifetime is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Debug)]
struct Session {
    operator: Operator,
    created: Instant,
}

/// Live sessions, held in process memory. Restarting the server logs
/// everyone out.
///
/// A session expires `ttl` after it was created. Expired sessions are
/// rejected by [`get`](Self::get) and dropped on the next
/// [`create`](Self::create), so the map holds at most the logins of one
/// lifetime.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session and return its token.
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().expect("lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, session| session.created.elapsed() < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "pruned expired sessions");
        }
        sessions.insert(
            token.clone(),
            Session {
                operator: Operator {
                    username: username.to_string(),
                },
                created: Instant::now(),
            },
        );
        token
    }

    /// The operator behind a live session.
    pub fn get(&self, token: &str) -> Option<Operator> {
        self.sessions
            .read()
            .expect("lock poisoned")
            .get(token)
            .filter(|session| session.created.elapsed() < self.ttl)
            .map(|session| session.operator.clone())
    }

    /// End a session. Returns `true` if it existed.
    pub fn remove(&self, token: &str) -> bool {
        self.sessions.write().expect("lock poisoned").remove(token).is_some()
    }

    /// Stored sessions, counting expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.sessions.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Session token from the request's `Cookie` headers, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, secure: bool) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; {}", cookie_attributes(secure))
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{SESSION_COOKIE}=; Path=/; Max-Age=0; {}",
        cookie_attributes(secure)
    )
}

fn cookie_attributes(secure: bool) -> &'static str {
    if secure {
        "HttpOnly; Secure; SameSite=None"
    } else {
        "HttpOnly; SameSite=Lax"
    }
}

/// Whether the request carries a live session.
pub fn is_authenticated(sessions: &SessionStore, headers: &HeaderMap) -> bool {
    session_token(headers).is_some_and(|token| sessions.get(&token).is_some())
}

#[async_trait]
impl FromRequestParts<AppState> for Operator {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        session_token(&parts.headers)
            .and_then(|token| state.sessions.get(&token))
            .ok_or(ServerError::Unauthorized)
    }
}
