use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_service::ServiceError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("not logged in")]
    Unauthorized,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Service(ServiceError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            match self {
                Self::Service(ServiceError::Store(_)) => "product store unavailable".to_string(),
                _ => "internal server error".to_string(),
            }
        } else {
            self.to_string()
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::TypeError;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServerError::AuthFailed("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::Service(ServiceError::Validation(TypeError::MissingField("category")))
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let err = ServerError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "/secret/path",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
