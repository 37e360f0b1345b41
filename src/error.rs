//! Error types for the lending desk

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes reported alongside every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotLoggedIn = 2,
    DbFailure = 3,
    AuthenticationFailed = 4,
    NoSuchItem = 5,
    ItemNotAvailable = 7,
    Duplicate = 8,
    NotBorrowed = 12,
    NoSelection = 14,
    BadValue = 18,
    UsernameAlreadyExists = 19,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sorry, '{0}' is not available.")]
    Unavailable(String),

    #[error("This book is not in your borrowed list.")]
    NotBorrowedByPatron,

    #[error("Username already exists.")]
    DuplicateUsername,

    #[error("Invalid username or password.")]
    AuthenticationFailed,

    /// Carries the attempted action, e.g. "borrow books"
    #[error("You must be logged in to {0}.")]
    NotLoggedIn(&'static str),

    /// Carries the attempted action, e.g. "borrow"
    #[error("Please select a book to {0}.")]
    NoSelection(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status and numeric code used when rendering this error
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchItem),
            AppError::Unavailable(_) => (StatusCode::CONFLICT, ErrorCode::ItemNotAvailable),
            AppError::NotBorrowedByPatron => (StatusCode::CONFLICT, ErrorCode::NotBorrowed),
            AppError::DuplicateUsername => {
                (StatusCode::CONFLICT, ErrorCode::UsernameAlreadyExists)
            }
            AppError::AuthenticationFailed => {
                (StatusCode::UNAUTHORIZED, ErrorCode::AuthenticationFailed)
            }
            AppError::NotLoggedIn(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotLoggedIn),
            AppError::NoSelection(_) => (StatusCode::BAD_REQUEST, ErrorCode::NoSelection),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_match_desk_wording() {
        assert_eq!(
            AppError::Unavailable("1984".to_string()).to_string(),
            "Sorry, '1984' is not available."
        );
        assert_eq!(
            AppError::NotLoggedIn("borrow books").to_string(),
            "You must be logged in to borrow books."
        );
        assert_eq!(
            AppError::NoSelection("return").to_string(),
            "Please select a book to return."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotBorrowedByPatron.status_and_code().0, StatusCode::CONFLICT);
        assert_eq!(AppError::AuthenticationFailed.status_and_code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NoSelection("borrow").status_and_code().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("x".to_string()).status_and_code().1,
            ErrorCode::NoSuchItem
        );
    }
}
