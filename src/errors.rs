use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input or a broken business rule
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Missing or unknown session token
    #[error("Authentication required")]
    Unauthenticated,

    /// Unknown login or wrong password. Both read the same to the caller.
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Account is blocked, contact an administrator")]
    Blocked,

    #[error("Password change required before continuing")]
    PasswordChangeRequired,

    #[error("{0}")]
    Forbidden(String),

    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to {operation}")]
    Internal { operation: String },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Message safe to hand to the caller.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Database(sqlx::Error::RowNotFound) => "Resource not found".to_string(),
            ApiError::Database(sqlx::Error::Database(db_err)) => {
                if db_err.is_unique_violation() {
                    unique_violation_message(db_err.message()).to_string()
                } else if db_err.is_foreign_key_violation() {
                    "Invalid reference to related resource".to_string()
                } else if db_err.is_check_violation() {
                    "Invalid data provided".to_string()
                } else {
                    "Database error occurred".to_string()
                }
            }
            ApiError::Database(_) | ApiError::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// SQLite reports unique violations as `UNIQUE constraint failed: <table>.<column>`.
fn unique_violation_message(message: &str) -> &'static str {
    if message.contains("users.phone") {
        "Phone is already used by another user"
    } else if message.contains("users.user_login") {
        "Login already exists"
    } else if message.contains("clients.phone") {
        "A client with this phone already exists"
    } else if message.contains("rooms.room_number") {
        "A room with this number already exists"
    } else {
        "Resource already exists"
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Blocked | ApiError::PasswordChangeRequired | ApiError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(err) => match err {
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    StatusCode::CONFLICT
                }
                sqlx::Error::Database(db_err)
                    if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
                {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Internal service error: {self}");
        } else {
            log::debug!("Client error: {self}");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.user_message(),
        })
    }
}
