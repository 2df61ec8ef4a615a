use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use catalog_service::{ServiceResult, Upload};
use catalog_types::{Collection, ProductForm};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::{clear_session_cookie, session_cookie, session_token, Operator};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A body that cannot be read as a login is treated as an empty one, so the
/// attempt fails verification like any other bad login.
fn unreadable_login(reason: String) -> LoginRequest {
    debug!(%reason, "unreadable login body");
    LoginRequest::default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteQuery {
    pub name: String,
}

/// `POST /login`, JSON or URL-encoded body.
pub async fn login_handler(State(state): State<AppState>, request: Request) -> ServerResult<Response> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    let login = if is_json {
        Json::<LoginRequest>::from_request(request, &state)
            .await
            .map(|Json(login)| login)
            .unwrap_or_else(|e| unreadable_login(e.body_text()))
    } else {
        Form::<LoginRequest>::from_request(request, &state)
            .await
            .map(|Form(login)| login)
            .unwrap_or_else(|e| unreadable_login(e.body_text()))
    };

    if !state.credentials.verify(&login.username, &login.password).await? {
        warn!(username = %login.username, "login rejected");
        return Err(ServerError::AuthFailed("invalid username or password".into()));
    }

    let token = state.sessions.create(&login.username);
    info!(username = %login.username, "operator logged in");
    let cookie = session_cookie(&token, state.config.secure_cookies);
    Ok(([(SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response())
}

/// `GET /logout`. Succeeds whether or not a session was active.
pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if state.sessions.remove(&token) {
            info!("operator logged out");
        }
    }
    let cookie = clear_session_cookie(state.config.secure_cookies);
    ([(SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response()
}

pub async fn dashboard_handler(
    _operator: Operator,
    State(state): State<AppState>,
) -> ServerResult<Html<String>> {
    let page = tokio::fs::read_to_string(&state.config.dashboard_page).await?;
    Ok(Html(page))
}

/// `GET /products`, the public catalog feed.
pub async fn products_handler(State(state): State<AppState>) -> ServerResult<Json<Collection>> {
    let catalog = state.catalog.clone();
    let products = run_blocking(move || catalog.list()).await?;
    Ok(Json(products))
}

/// `POST /update-product`, multipart form with an optional image file.
pub async fn update_product_handler(
    operator: Operator,
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<Value>> {
    let (form, upload) = read_product_form(multipart).await?;
    let catalog = state.catalog.clone();
    let outcome = run_blocking(move || catalog.upsert(&form, upload)).await?;
    info!(operator = %operator.username, product = %outcome.product.name, "product saved");
    Ok(Json(json!({
        "success": true,
        "created": outcome.applied.is_created(),
        "product": outcome.product,
    })))
}

/// `DELETE /delete-product?name=...`. Succeeds even when nothing matches.
pub async fn delete_product_handler(
    operator: Operator,
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> ServerResult<Json<Value>> {
    let catalog = state.catalog.clone();
    let name = query.name;
    let removed = run_blocking(move || catalog.delete(&name)).await?;
    info!(operator = %operator.username, removed, "delete handled");
    Ok(Json(json!({ "success": true, "removed": removed })))
}

/// Collect the text fields and the first named file from a product form.
///
/// A file part with an empty file name is how browsers send an untouched
/// file input; it is not an upload.
async fn read_product_form(mut multipart: Multipart) -> ServerResult<(ProductForm, Option<Upload>)> {
    let mut form = ProductForm::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(e.body_text()))?;
            if !file_name.is_empty() && upload.is_none() {
                upload = Some(Upload::new(file_name, data.to_vec()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;
        match name.as_str() {
            "productName" => form.name = value,
            "category" => form.category = value,
            "inStock" => form.in_stock = value,
            "originalName" => form.original_name = Some(value),
            _ => {}
        }
    }

    Ok((form, upload))
}

/// Store I/O is blocking; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}
