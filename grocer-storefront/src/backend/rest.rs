//! HTTP adapter for a PostgREST-style hosted backend
//!
//! Tables live under `/rest/v1/{table}` and auth under `/auth/v1/...`. Every
//! request carries the anon key; signed-in requests also carry the user's
//! bearer token.

use super::{AuthProvider, Backend, Filter, Query, SignUpOutcome};
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use shared::models::{Session, SessionUser};
use std::sync::Arc;
use std::time::Duration;

/// Query-string pairs for a set of filters (`col=eq.value`)
pub fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| match filter {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{value}")),
            Filter::Neq { column, value } => (column.clone(), format!("neq.{value}")),
        })
        .collect()
}

/// Query-string pairs for a select
pub fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    pairs.extend(filter_pairs(&query.filters));
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit".to_string(), limit.to_string()));
    }
    pairs
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: SessionUser,
}

/// Backend reached over HTTP
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    session: Arc<RwLock<Option<Session>>>,
}

impl RestBackend {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Bearer token: the user's access token, or the anon key when signed out
    fn bearer(&self) -> String {
        let token = self
            .session
            .read()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone());
        format!("Bearer {token}")
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer())
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
                _ => Err(BackendError::Status {
                    status: status.as_u16(),
                    message,
                }),
            };
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn store_session(&self, token: TokenResponse) -> Session {
        let session = Session {
            access_token: token.access_token,
            user: token.user,
        };
        *self.session.write() = Some(session.clone());
        session
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, table: &str, query: &Query) -> BackendResult<Vec<Value>> {
        let request = self
            .authorize(self.client.get(self.table_url(table)))
            .query(&query_pairs(query));
        Self::handle_response(request.send().await?).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> BackendResult<Vec<Value>> {
        let request = self
            .authorize(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&rows);
        Self::handle_response(request.send().await?).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: &[Filter],
    ) -> BackendResult<Vec<Value>> {
        let request = self
            .authorize(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&filter_pairs(filters))
            .json(&patch);
        Self::handle_response(request.send().await?).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let request = self
            .authorize(self.client.delete(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&filter_pairs(filters));
        let removed: Vec<Value> = Self::handle_response(request.send().await?).await?;
        Ok(removed.len() as u64)
    }
}

#[async_trait]
impl AuthProvider for RestBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let request = self
            .authorize(self.client.post(self.auth_url("token")))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let token: TokenResponse = match Self::handle_response(request.send().await?).await {
            Ok(token) => token,
            Err(BackendError::Status { status: 400, .. }) => {
                return Err(BackendError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        tracing::info!(user_id = %token.user.id, "Signed in");
        Ok(self.store_session(token))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> BackendResult<SignUpOutcome> {
        let request = self
            .authorize(self.client.post(self.auth_url("signup")))
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "username": username },
            }));

        let body: Value = match Self::handle_response(request.send().await?).await {
            Ok(body) => body,
            Err(BackendError::Status { status, message })
                if (status == 400 || status == 422) && message.contains("already registered") =>
            {
                return Err(BackendError::EmailTaken(email.to_string()));
            }
            Err(e) => return Err(e),
        };

        // Without an access token the account awaits e-mail confirmation
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            tracing::info!(user_id = %token.user.id, "Account registered");
            Ok(SignUpOutcome::SignedIn(self.store_session(token)))
        } else {
            tracing::info!(email, "Account registered, confirmation pending");
            Ok(SignUpOutcome::ConfirmationRequired)
        }
    }

    async fn sign_out(&self) -> BackendResult<()> {
        if self.session.read().is_none() {
            return Ok(());
        }
        let request = self.authorize(self.client.post(self.auth_url("logout")));
        let response = request.send().await?;
        // The local session is dropped even if the server already forgot it
        self.session.write().take();
        if !response.status().is_success() && response.status() != StatusCode::UNAUTHORIZED {
            return Err(BackendError::Status {
                status: response.status().as_u16(),
                message: response.text().await?,
            });
        }
        Ok(())
    }

    async fn get_session(&self) -> BackendResult<Option<Session>> {
        Ok(self.session.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_pairs_for_user_orders() {
        let query = Query::new()
            .eq("user_id", "u1")
            .neq("status", "cancelled")
            .order_by("created_at", false);
        assert_eq!(
            query_pairs(&query),
            pairs(&[
                ("select", "*"),
                ("user_id", "eq.u1"),
                ("status", "neq.cancelled"),
                ("order", "created_at.desc"),
            ])
        );
    }

    #[test]
    fn test_query_pairs_with_limit() {
        let query = Query::new().order_by("name", true).limit(Some(50));
        assert_eq!(
            query_pairs(&query),
            pairs(&[("select", "*"), ("order", "name.asc"), ("limit", "50")])
        );
    }

    #[test]
    fn test_filter_pairs() {
        assert_eq!(
            filter_pairs(&[Filter::eq("order_id", 7)]),
            pairs(&[("order_id", "eq.7")])
        );
        assert!(filter_pairs(&[]).is_empty());
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let backend =
            RestBackend::new("http://localhost:54321/", "anon", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:54321");
        assert_eq!(
            backend.table_url("products"),
            "http://localhost:54321/rest/v1/products"
        );
        assert_eq!(
            backend.auth_url("token"),
            "http://localhost:54321/auth/v1/token"
        );
    }

    #[test]
    fn test_bearer_falls_back_to_anon_key() {
        let backend = RestBackend::new("http://localhost", "anon", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.bearer(), "Bearer anon");

        backend.store_session(TokenResponse {
            access_token: "user-token".into(),
            user: SessionUser {
                id: "u1".into(),
                email: None,
            },
        });
        assert_eq!(backend.bearer(), "Bearer user-token");
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_local() {
        let backend = RestBackend::new("http://localhost", "anon", Duration::from_secs(5)).unwrap();
        backend.sign_out().await.unwrap();
        assert_eq!(backend.get_session().await.unwrap(), None);
    }
}
