use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::services::asset_error::{AssetError, ErrorKind};

/// A lightweight wrapper for request-level errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ProtectedAsset => StatusCode::FORBIDDEN,
            ErrorKind::IoFailure => {
                error!("storage failure: {} ({:?})", err, err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        AppError::new(status, err.public_message())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::new(err.status(), format!("invalid multipart body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::namespace::Namespace;

    #[test]
    fn asset_errors_map_to_statuses() {
        let cases = [
            (AssetError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AssetError::unsupported("text/plain", &["png"]),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                AssetError::NotFound {
                    namespace: Namespace::Order,
                    name: "a.png".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AssetError::ProtectedAsset("Padrao.jpeg".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                AssetError::Io(std::io::Error::other("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status, status);
            assert!(!app.message.contains("disk on fire"));
        }
    }
}
