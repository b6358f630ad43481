//! HTTP status mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::CategoryNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailAlreadyRegistered
            | Self::OrderAlreadyCancelled
            | Self::OrderNotCancellable => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::EmailNotConfirmed => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageCorrupted
            | Self::SynonymTableInvalid
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Classify a status returned by the hosted backend
    pub fn from_http_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200..300 => Self::Success,
            400 | 422 => Self::ValidationFailed,
            401 => Self::NotAuthenticated,
            403 => Self::PermissionDenied,
            404 | 406 => Self::NotFound,
            409 => Self::AlreadyExists,
            408 | 504 => Self::TimeoutError,
            502 | 503 => Self::NetworkError,
            500..600 => Self::DatabaseError,
            _ => Self::Unknown,
        }
    }
}
