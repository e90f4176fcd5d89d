// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Raised when a wire string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    // The backend answered 401: the upstream session is gone.
    #[error("Authentication expired")]
    AuthenticationExpired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Backend responded {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// 4xx-class failures are final; retrying them cannot succeed. A body that
    /// does not decode is final too: the backend will send the same body again.
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::Backend { status, .. } => (400..500).contains(status),
            AppError::Http(e) => e.is_decode(),
            AppError::InvalidCredentials
            | AppError::AuthenticationExpired
            | AppError::ValidationError(_)
            | AppError::Forbidden(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Authentication token is invalid or missing.".to_string()),
            AppError::AuthenticationExpired => (StatusCode::UNAUTHORIZED, "Authentication expired. Please login again.".to_string()),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::UnknownRole(role) => (StatusCode::NOT_FOUND, format!("Role '{}' does not exist.", role)),
            AppError::Backend { status, ref message } => {
                tracing::warn!(status, "CRM backend error: {}", message);
                (StatusCode::BAD_GATEWAY, "The CRM backend rejected the request.".to_string())
            }
            AppError::Http(ref e) if e.is_decode() => {
                tracing::warn!("Undecodable CRM backend response: {}", e);
                (StatusCode::BAD_GATEWAY, "The CRM backend sent an unreadable response.".to_string())
            }

            // Everything else is a 500; the detail goes to the log only.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
