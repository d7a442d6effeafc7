//!
//! # Error Handling
//!
//! This module defines `AppError`, the error type shared by the store, the
//! service layer, the request gate and the HTTP handlers.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a handler can
//! return it directly and Actix Web renders the matching status code with a
//! `{"error": "..."}` JSON body. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors` and `bcrypt::BcryptError` let the `?`
//! operator do the conversion.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to clients for any storage failure. The underlying
/// error is logged, never sent over the wire.
const STORAGE_FAILURE: &str = "Storage failure";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Bad credentials or a missing token (HTTP 401).
    Unauthorized(String),
    /// A token that is malformed, expired, or signed with another key or
    /// algorithm (HTTP 401).
    InvalidToken(String),
    /// A malformed request that is not a field validation failure (HTTP 400).
    BadRequest(String),
    /// A request body or path that failed to parse or validate (HTTP 400).
    ValidationError(String),
    /// The resource already exists, e.g. a taken username (HTTP 409).
    Conflict(String),
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// A storage operation failed (HTTP 500).
    DatabaseError(String),
    /// Any other server-side failure, e.g. hashing or signing (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::InvalidToken(msg) => format!("Invalid token: {}", msg),
            AppError::DatabaseError(_) => STORAGE_FAILURE.to_string(),
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Every `sqlx` failure surfaces as a storage failure; the store never
/// interprets it further and nothing retries.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        log::error!("Storage operation failed: {}", error);
        AppError::DatabaseError(error.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
