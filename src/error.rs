//! Unified application error model and mapping helpers.
//! This module provides a common error enum shared by the HTTP surface and the
//! upstream client, so handlers can propagate failures with `?` and map them to
//! responses in one place. Upstream status and body text travel inside the error
//! for the logs; the client only ever sees a generic notice.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    #[error("{code}: {message}")]
    UserInput { code: String, message: String },
    #[error("{code}: {message}")]
    Auth { code: String, message: String },
    #[error("{code}: {message}")]
    Forbidden { code: String, message: String },
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },
    #[error("{code}: upstream HTTP {status}: {message}")]
    Upstream { status: u16, code: String, message: String },
    #[error("{code}: {message}")]
    Transport { code: String, message: String },
    #[error("{code}: {message}")]
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Upstream { code, .. }
            | AppError::Transport { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Upstream { message, .. }
            | AppError::Transport { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn forbidden<S: Into<String>>(code: S, msg: S) -> Self { AppError::Forbidden { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Non-2xx upstream response; the body text rides along for the logs.
    pub fn upstream(status: u16, body: &str) -> Self {
        AppError::Upstream { status, code: "upstream_error".into(), message: body.to_string() }
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        AppError::Transport { code: "transport".into(), message: msg.into() }
    }

    /// HTTP status this error renders as on our own surface. Upstream failures map
    /// to 502 regardless of the upstream status, which is only kept for the logs.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::Auth { .. } => 401,
            AppError::Forbidden { .. } => 403,
            AppError::NotFound { .. } => 404,
            AppError::Upstream { .. } => 502,
            AppError::Transport { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }

    /// What the client is shown. Input/auth errors carry their message; upstream,
    /// transport and internal failures collapse to a generic notice.
    pub fn user_facing(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::NotFound { message, .. } => message.as_str(),
            AppError::Upstream { .. } | AppError::Transport { .. } => "request failed",
            AppError::Internal { .. } => "internal error",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport { code: "transport".into(), message: e.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::error!(code = self.code_str(), detail = %self, "request failed");
        let body = Json(serde_json::json!({ "status": "error", "error": self.user_facing() }));
        (status, body).into_response()
    }
}
