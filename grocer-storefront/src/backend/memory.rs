//! In-process backend
//!
//! Implements both [`Backend`] and [`AuthProvider`] over JSON rows held in
//! memory. Used by the demo binary and the tests; clones share state.

use super::{AuthProvider, Backend, Filter, Query, SignUpOutcome, tables, value_text};
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use shared::models::{DEFAULT_ROLE, Session, SessionUser};
use shared::util::snowflake_id;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password_hash: String,
    confirmed: bool,
}

/// Salted SHA-256 of a password; the account id is the salt
fn hash_password(account_id: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{account_id}:{password}").as_bytes());
    hex::encode(digest)
}

/// Total order over JSON cells: nulls first, numbers numerically, the rest by text
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => value_text(a).cmp(&value_text(b)),
    }
}

#[derive(Default)]
struct Inner {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Session>>,
    next_id: AtomicU64,
    require_confirmation: bool,
}

/// Backend keeping every table in memory
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.inner.tables.read();
        f.debug_struct("MemoryBackend")
            .field("tables", &tables.keys().collect::<Vec<_>>())
            .field("accounts_count", &self.inner.accounts.read().len())
            .finish()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose sign-ups must be confirmed before signing in
    pub fn with_email_confirmation() -> Self {
        Self {
            inner: Arc::new(Inner {
                require_confirmation: true,
                ..Inner::default()
            }),
        }
    }

    /// Mark an account's e-mail as confirmed
    pub fn confirm_email(&self, email: &str) -> BackendResult<()> {
        let mut accounts = self.inner.accounts.write();
        let account = accounts
            .get_mut(&email.to_lowercase())
            .ok_or_else(|| BackendError::NotFound(format!("account {email}")))?;
        account.confirmed = true;
        Ok(())
    }

    /// Number of rows currently stored in `table`
    pub fn row_count(&self, table: &str) -> usize {
        self.inner.tables.read().get(table).map_or(0, Vec::len)
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }

    fn open_session(&self, account: &Account) -> Session {
        let session = Session {
            access_token: format!("mem-{}", snowflake_id()),
            user: SessionUser {
                id: account.id.clone(),
                email: Some(account.email.clone()),
            },
        };
        *self.inner.session.write() = Some(session.clone());
        tracing::info!(user_id = %account.id, "Signed in");
        session
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> BackendResult<Vec<Value>> {
        let tables = self.inner.tables.read();
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_cells(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending { ord } else { ord.reverse() }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> BackendResult<Vec<Value>> {
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut fields) = row else {
                return Err(BackendError::Invalid(format!(
                    "rows inserted into {table} must be JSON objects"
                )));
            };
            fields
                .entry("id")
                .or_insert_with(|| Value::from(self.next_id()));
            fields
                .entry("created_at")
                .or_insert_with(|| Value::from(chrono::Utc::now().to_rfc3339()));
            stored.push(Value::Object(fields));
        }

        self.inner
            .tables
            .write()
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());

        tracing::debug!(table, count = stored.len(), "Rows inserted");
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: &[Filter],
    ) -> BackendResult<Vec<Value>> {
        let Value::Object(patch) = patch else {
            return Err(BackendError::Invalid(format!(
                "update patch for {table} must be a JSON object"
            )));
        };

        let mut tables = self.inner.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows
            .iter_mut()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
        {
            if let Value::Object(fields) = row {
                for (key, value) in &patch {
                    fields.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let mut tables = self.inner.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !filters.iter().all(|f| f.matches(row)));
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let account = self
            .inner
            .accounts
            .read()
            .get(&email.to_lowercase())
            .cloned()
            .ok_or(BackendError::InvalidCredentials)?;

        if account.password_hash != hash_password(&account.id, password) {
            tracing::warn!(email, "Sign-in rejected");
            return Err(BackendError::InvalidCredentials);
        }
        if !account.confirmed {
            return Err(BackendError::EmailNotConfirmed(account.email));
        }
        Ok(self.open_session(&account))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> BackendResult<SignUpOutcome> {
        let key = email.to_lowercase();
        let account = {
            let mut accounts = self.inner.accounts.write();
            if accounts.contains_key(&key) {
                return Err(BackendError::EmailTaken(email.to_string()));
            }
            let id = snowflake_id().to_string();
            let account = Account {
                password_hash: hash_password(&id, password),
                id,
                email: email.to_string(),
                confirmed: !self.inner.require_confirmation,
            };
            accounts.insert(key, account.clone());
            account
        };

        let mut profile = Map::new();
        profile.insert("id".into(), json!(account.id));
        profile.insert("username".into(), json!(username));
        profile.insert("role".into(), json!(DEFAULT_ROLE));
        self.insert(tables::PROFILES, vec![Value::Object(profile)])
            .await?;

        tracing::info!(user_id = %account.id, "Account registered");
        if account.confirmed {
            Ok(SignUpOutcome::SignedIn(self.open_session(&account)))
        } else {
            Ok(SignUpOutcome::ConfirmationRequired)
        }
    }

    async fn sign_out(&self) -> BackendResult<()> {
        if let Some(session) = self.inner.session.write().take() {
            tracing::info!(user_id = %session.user.id, "Signed out");
        }
        Ok(())
    }

    async fn get_session(&self) -> BackendResult<Option<Session>> {
        Ok(self.inner.session.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_generates_id_and_created_at() {
        let backend = MemoryBackend::new();
        let rows = backend
            .insert("orders", vec![json!({"status": "pending"}), json!({"status": "pending"})])
            .await
            .unwrap();

        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[1]["id"], json!(2));
        assert!(rows[0]["created_at"].is_string());
        assert_eq!(backend.row_count("orders"), 2);
    }

    #[tokio::test]
    async fn test_insert_keeps_given_id() {
        let backend = MemoryBackend::new();
        let rows = backend
            .insert("products", vec![json!({"id": "p-1", "name": "Pear"})])
            .await
            .unwrap();
        assert_eq!(rows[0]["id"], json!("p-1"));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let backend = MemoryBackend::new();
        let err = backend.insert("products", vec![json!(42)]).await.unwrap_err();
        assert!(matches!(err, BackendError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let backend = MemoryBackend::new();
        backend
            .insert(
                "products",
                vec![
                    json!({"name": "Pear", "price": 2.5}),
                    json!({"name": "Apple", "price": 10}),
                    json!({"name": "Fig", "price": 3}),
                ],
            )
            .await
            .unwrap();

        let by_name = backend
            .select("products", &Query::new().order_by("name", true))
            .await
            .unwrap();
        let names: Vec<&str> = by_name.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Apple", "Fig", "Pear"]);

        let priciest = backend
            .select("products", &Query::new().order_by("price", false).limit(Some(1)))
            .await
            .unwrap();
        assert_eq!(priciest[0]["name"], json!("Apple"));

        let none = backend
            .select("products", &Query::new().eq("name", "Kiwi"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_select_unknown_table_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.select("nope", &Query::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let backend = MemoryBackend::new();
        backend
            .insert(
                "orders",
                vec![json!({"status": "pending"}), json!({"status": "completed"})],
            )
            .await
            .unwrap();

        let updated = backend
            .update("orders", json!({"status": "cancelled"}), &[Filter::eq("id", 1)])
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], json!("cancelled"));

        let removed = backend
            .delete("orders", &[Filter::eq("status", "cancelled")])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(backend.row_count("orders"), 1);
    }

    #[tokio::test]
    async fn test_sign_up_creates_customer_profile_and_session() {
        let backend = MemoryBackend::new();
        let outcome = backend
            .sign_up("ana@example.com", "secret", "ana")
            .await
            .unwrap();
        let SignUpOutcome::SignedIn(session) = outcome else {
            panic!("expected a session");
        };

        let profiles = backend
            .select(tables::PROFILES, &Query::new().eq("id", &session.user.id))
            .await
            .unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["role"], json!("customer"));
        assert_eq!(profiles[0]["username"], json!("ana"));
        assert_eq!(backend.get_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_is_rejected() {
        let backend = MemoryBackend::new();
        backend.sign_up("ana@example.com", "secret", "ana").await.unwrap();
        let err = backend
            .sign_up("Ana@Example.com", "other", "ana2")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = MemoryBackend::new();
        backend.sign_up("ana@example.com", "secret", "ana").await.unwrap();
        backend.sign_out().await.unwrap();
        assert_eq!(backend.get_session().await.unwrap(), None);

        let err = backend.sign_in("ana@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidCredentials));
        let err = backend.sign_in("bob@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidCredentials));

        let session = backend.sign_in("ana@example.com", "secret").await.unwrap();
        assert_eq!(session.user.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn test_email_confirmation_flow() {
        let backend = MemoryBackend::with_email_confirmation();
        let outcome = backend
            .sign_up("ana@example.com", "secret", "ana")
            .await
            .unwrap();
        assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
        assert_eq!(backend.get_session().await.unwrap(), None);

        let err = backend.sign_in("ana@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, BackendError::EmailNotConfirmed(_)));

        backend.confirm_email("ana@example.com").unwrap();
        assert!(backend.sign_in("ana@example.com", "secret").await.is_ok());
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(hash_password("a", "secret"), hash_password("b", "secret"));
        assert_eq!(hash_password("a", "secret").len(), 64);
    }
}
