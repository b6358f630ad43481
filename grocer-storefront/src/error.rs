//! Backend error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by backend adapters
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Row or response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No row matched
    #[error("Not found: {0}")]
    NotFound(String),

    /// No active session
    #[error("Authentication required")]
    Unauthorized,

    /// Wrong email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but the e-mail was never confirmed
    #[error("Email not confirmed: {0}")]
    EmailNotConfirmed(String),

    /// Email already has an account
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Invalid request (bad table name, bad payload shape)
    #[error("Invalid request: {0}")]
    Invalid(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by local durable state
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted
    #[error("Invalid state key: {0:?}")]
    InvalidKey(String),
}

/// Result type for local state operations
pub type LocalResult<T> = Result<T, LocalStoreError>;

impl From<LocalStoreError> for AppError {
    fn from(err: LocalStoreError) -> Self {
        match err {
            LocalStoreError::InvalidKey(key) => {
                AppError::invalid_request(format!("Invalid state key: {key:?}"))
            }
            other => AppError::with_message(ErrorCode::StorageCorrupted, other.to_string()),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            BackendError::Http(e) => AppError::with_message(ErrorCode::NetworkError, e.to_string()),
            BackendError::Status { status, message } => {
                let code = http::StatusCode::from_u16(status)
                    .map(ErrorCode::from_http_status)
                    .unwrap_or(ErrorCode::Unknown);
                AppError::with_message(code, message).with_detail("status", status)
            }
            BackendError::Decode(e) => AppError::with_message(ErrorCode::InvalidFormat, e.to_string()),
            BackendError::NotFound(what) => AppError::not_found(what),
            BackendError::Unauthorized => AppError::not_authenticated(),
            BackendError::InvalidCredentials => AppError::invalid_credentials(),
            BackendError::EmailTaken(email) => {
                AppError::new(ErrorCode::EmailAlreadyRegistered).with_detail("email", email)
            }
            BackendError::EmailNotConfirmed(email) => {
                AppError::new(ErrorCode::EmailNotConfirmed).with_detail("email", email)
            }
            BackendError::Invalid(msg) => AppError::invalid_request(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_through_http_code() {
        let err: AppError = BackendError::Status {
            status: 401,
            message: "JWT expired".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(err.message, "JWT expired");

        let err: AppError = BackendError::Status {
            status: 503,
            message: "upstream".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }

    #[test]
    fn test_local_store_errors() {
        let err: AppError = LocalStoreError::InvalidKey("../etc".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = LocalStoreError::Io(io).into();
        assert_eq!(err.code, ErrorCode::StorageCorrupted);
    }

    #[test]
    fn test_auth_errors() {
        let err: AppError = BackendError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        let err: AppError = BackendError::EmailTaken("a@b.c".into()).into();
        assert_eq!(err.code, ErrorCode::EmailAlreadyRegistered);
    }
}
