use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// The message returned for every fault the caller is not meant to see.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error, contact an administrator.";

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection could not be taken from the pool.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// The pool could not be built.
    #[error("Pool configuration error: {0}")]
    PoolConfig(#[from] deadpool_postgres::CreatePoolError),

    /// The referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The caller is authenticated but does not own the record.
    #[error("{0}")]
    Forbidden(String),

    /// The supplied password does not match the stored hash.
    #[error("{0}")]
    InvalidCredential(String),

    /// Missing or invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The request body failed field validation.
    #[error("{0}")]
    Validation(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl AppError {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidCredential(_) | AppError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::PoolConfig(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-facing message. Internal details never leave the process.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::InvalidCredential(msg)
            | AppError::Unauthorized(msg)
            | AppError::Validation(msg) => msg,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// Builds the failure envelope for a status and message.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = sonic_rs::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, INTERNAL_ERROR_MESSAGE));

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(ref e) => tracing::error!("Database error: {}", e),
            AppError::Pool(ref e) => tracing::error!("Pool error: {}", e),
            AppError::PoolConfig(ref e) => tracing::error!("Pool configuration error: {}", e),
            AppError::Internal(ref msg) => tracing::error!("Internal error: {}", msg),
            AppError::NotFound(ref msg) => tracing::debug!("Not found: {}", msg),
            AppError::Forbidden(ref msg) => tracing::warn!("Forbidden: {}", msg),
            AppError::InvalidCredential(ref msg) => tracing::warn!("Invalid credential: {}", msg),
            AppError::Unauthorized(ref msg) => tracing::warn!("Unauthorized: {}", msg),
            AppError::Validation(ref msg) => tracing::debug!("Validation error: {}", msg),
        }

        error_response(self.status(), self.public_message())
    }
}
