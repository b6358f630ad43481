//! Catalog error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Catalog error types
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category title is empty")]
    EmptyTitle,

    #[error("Invalid synonym table: {0}")]
    InvalidSynonyms(String),

    #[error("Failed to read synonym table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse synonym table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => {
                AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id)
            }
            CatalogError::EmptyTitle => AppError::new(ErrorCode::CategoryTitleRequired)
                .with_detail("field", "title"),
            CatalogError::InvalidSynonyms(msg) => {
                AppError::with_message(ErrorCode::SynonymTableInvalid, msg)
            }
            CatalogError::Io(e) => AppError::with_message(ErrorCode::ConfigError, e.to_string()),
            CatalogError::Parse(e) => {
                AppError::with_message(ErrorCode::SynonymTableInvalid, e.to_string())
            }
        }
    }
}
