//! Error codes shared by the catalog and storefront crates
//!
//! Codes are grouped by their thousands digit: 0xxx general, 1xxx auth,
//! 2xxx permission, 4xxx order, 6xxx catalog, 9xxx system.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Declares every code once: variant, wire value and default message.
macro_rules! error_codes {
    ($( $(#[$meta:meta])* $name:ident = $value:literal => $message:literal, )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every known code, in declaration order
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$name, )+];

            /// Developer-facing English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    Success = 0 => "Operation completed successfully",
    Unknown = 1 => "An unknown error occurred",
    ValidationFailed = 2 => "Validation failed",
    NotFound = 3 => "Resource not found",
    AlreadyExists = 4 => "Resource already exists",
    InvalidRequest = 5 => "Invalid request",
    /// Payload did not decode
    InvalidFormat = 6 => "Invalid format",

    NotAuthenticated = 1001 => "User is not authenticated",
    InvalidCredentials = 1002 => "Invalid email or password",
    EmailAlreadyRegistered = 1008 => "Email address is already registered",
    /// Sign-in before the confirmation link was followed
    EmailNotConfirmed = 1016 => "Email not confirmed",

    PermissionDenied = 2001 => "Permission denied",
    AdminRequired = 2003 => "Administrator role is required",

    OrderNotFound = 4001 => "Order not found",
    OrderAlreadyCancelled = 4004 => "Order has already been cancelled",
    OrderEmpty = 4007 => "Order has no items",
    /// Only pending and processing orders can be cancelled
    OrderNotCancellable = 4008 => "Order can no longer be cancelled",

    ProductInvalidPrice = 6002 => "Product price must be positive",
    CategoryNotFound = 6101 => "Category not found",
    CategoryTitleRequired = 6104 => "Category title is required",
    SynonymTableInvalid = 6201 => "Synonym table is invalid",

    InternalError = 9001 => "Internal error",
    /// Hosted backend rejected or failed the request
    DatabaseError = 9002 => "Database error",
    NetworkError = 9003 => "Network error",
    TimeoutError = 9004 => "Operation timed out",
    ConfigError = 9005 => "Configuration error",
    /// Local cart, wishlist or category state could not be read or written
    StorageCorrupted = 9403 => "Local state corrupted",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number outside the known code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
