use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings. Every field has a default, so a TOML file only needs the
/// keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// The product collection document.
    pub products_path: PathBuf,
    /// Operator credentials (JSON array of `{username, password}`).
    pub users_path: PathBuf,
    /// Served at `/`; uploaded images live underneath it.
    pub public_dir: PathBuf,
    /// Upload directory, relative to `public_dir`.
    pub uploads_dir: PathBuf,
    /// HTML returned by `GET /dashboard` to logged-in operators.
    pub dashboard_page: PathBuf,
    /// Origins allowed to make credentialed cross-origin requests.
    pub allowed_origins: Vec<String>,
    /// Production cookie mode: `Secure; SameSite=None` instead of `SameSite=Lax`.
    pub secure_cookies: bool,
    /// Seconds a login stays valid.
    pub session_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            products_path: PathBuf::from("data/products.json"),
            users_path: PathBuf::from("data/users.json"),
            public_dir: PathBuf::from("public"),
            uploads_dir: PathBuf::from("uploads"),
            dashboard_page: PathBuf::from("views/dashboard.html"),
            allowed_origins: vec![
                "https://mamaidashoes.com".into(),
                "http://127.0.0.1:5500".into(),
            ],
            secure_cookies: false,
            session_ttl_secs: 24 * 60 * 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file, or use defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Same settings with every file location placed under `root`.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.products_path = root.join(&self.products_path);
        self.users_path = root.join(&self.users_path);
        self.public_dir = root.join(&self.public_dir);
        self.dashboard_page = root.join(&self.dashboard_page);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.products_path, PathBuf::from("data/products.json"));
        assert_eq!(c.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(c.allowed_origins.len(), 2);
        assert!(!c.secure_cookies);
        assert_eq!(c.session_ttl(), crate::auth::DEFAULT_SESSION_TTL);
        assert_eq!(c.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            secure_cookies = true
            allowed_origins = ["https://shop.example"]
            session_ttl_secs = 900
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert!(c.secure_cookies);
        assert_eq!(c.allowed_origins, vec!["https://shop.example".to_string()]);
        assert_eq!(c.session_ttl(), Duration::from_secs(900));
        assert_eq!(c.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 42").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::load(Some(Path::new("/nonexistent/catalog.toml"))).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn rooted_at_prefixes_paths() {
        let c = ServerConfig::default().rooted_at(Path::new("/srv/shop"));
        assert_eq!(c.products_path, PathBuf::from("/srv/shop/data/products.json"));
        assert_eq!(c.public_dir, PathBuf::from("/srv/shop/public"));
        assert_eq!(c.uploads_dir, PathBuf::from("uploads"));
    }
}
