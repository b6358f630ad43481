//! Backend collaborator
//!
//! The storefront talks to a hosted table + auth service through two small
//! traits. Rows travel as `serde_json::Value` so adapters stay schema-free;
//! typed decoding happens in [`crate::api`].

pub mod memory;
pub mod rest;

use crate::error::BackendResult;
use async_trait::async_trait;
use serde_json::Value;
use shared::models::Session;

pub use memory::MemoryBackend;
pub use rest::RestBackend;

/// Table names used by the storefront
pub mod tables {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";
    pub const PROFILES: &str = "profiles";
}

/// Column predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    Neq { column: String, value: String },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn neq(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Neq {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::Neq { column, .. } => column,
        }
    }

    /// Whether a JSON row passes this predicate
    ///
    /// Cell values are compared by their text form, so `12` matches `"12"`.
    /// A missing column is treated as `null`.
    pub fn matches(&self, row: &Value) -> bool {
        let cell = value_text(row.get(self.column()).unwrap_or(&Value::Null));
        match self {
            Self::Eq { value, .. } => &cell == value,
            Self::Neq { value, .. } => &cell != value,
        }
    }
}

/// Text form of a JSON cell, as it would appear in a query string
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Sort order for a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Select query: filters, optional ordering and row limit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn neq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::neq(column, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Table access on the hosted service
#[async_trait]
pub trait Backend: Send + Sync {
    /// Rows matching the query
    async fn select(&self, table: &str, query: &Query) -> BackendResult<Vec<Value>>;

    /// Insert rows, returning them as stored (with generated `id`/`created_at`)
    async fn insert(&self, table: &str, rows: Vec<Value>) -> BackendResult<Vec<Value>>;

    /// Merge `patch` into every matching row, returning the updated rows
    async fn update(&self, table: &str, patch: Value, filters: &[Filter])
    -> BackendResult<Vec<Value>>;

    /// Delete matching rows, returning how many were removed
    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64>;
}

/// Result of a sign-up attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account created and signed in
    SignedIn(Session),
    /// Account created; the user must confirm their e-mail first
    ConfirmationRequired,
}

/// E-mail/password authentication on the hosted service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session>;

    async fn sign_up(&self, email: &str, password: &str, username: &str)
    -> BackendResult<SignUpOutcome>;

    async fn sign_out(&self) -> BackendResult<()>;

    /// The active session, if any
    async fn get_session(&self) -> BackendResult<Option<Session>>;
}
