use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all catalog endpoints.
///
/// Anything not matched by a route is served from the public directory.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir);
    let cors = cors_layer(&state.config.allowed_origins);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/login", post(handler::login_handler))
        .route("/logout", get(handler::logout_handler))
        .route("/dashboard", get(handler::dashboard_handler))
        .route("/products", get(handler::products_handler))
        .route("/update-product", post(handler::update_product_handler))
        .route("/delete-product", delete(handler::delete_product_handler))
        .fallback_service(static_files)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for a fixed set of frontend origins.
///
/// Requests without an `Origin` header (same-origin, curl, Postman) are
/// unaffected; other origins simply get no CORS headers.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
