use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type Result<T> = std::result::Result<T, Error>;

/// Field name → message, as returned under `validationErrors`.
pub type FieldErrors = BTreeMap<String, String>;

pub const DUPLICATE_EMAIL: &str = "Email existente";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body shared by every service: `{timestamp, code, message, path}`,
/// plus `validationErrors` for field-level failures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(value_type = String, example = "2025-10-23")]
    pub timestamp: NaiveDate,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub validation_errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().date_naive(),
            code: status.as_u16(),
            message: message.into(),
            path: None,
            validation_errors: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::BadGateway(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            Error::BadRequest(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::UpstreamUnavailable(msg)
            | Error::BadGateway(msg) => ErrorResponse::new(status, msg),
            Error::Validation(fields) => {
                let mut body = ErrorResponse::new(status, "Validation failed");
                body.validation_errors = Some(fields);
                body
            }
            other => {
                tracing::error!(error = %other, "request failed");
                ErrorResponse::new(status, "An unexpected error occurred")
            }
        };

        // `middleware::error_path` re-renders the body with the request path.
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                Error::Conflict(DUPLICATE_EMAIL.to_string())
            }
            other => Error::Database(other),
        }
    }
}
