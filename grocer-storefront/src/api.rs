//! Storefront API
//!
//! Typed operations over the [`Backend`] and [`AuthProvider`] primitives.
//! Product listings are partitioned by category with the [`CategoryMatcher`].

use crate::backend::{AuthProvider, Backend, Filter, Query, RestBackend, SignUpOutcome, tables};
use crate::config::StorefrontConfig;
use grocer_catalog::{CategoryMatcher, CategoryStore};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AuthUser, Category, Order, OrderCreate, OrderItem, OrderStatus, Product, ProductCreate,
    ProductRow, Profile, Session,
};
use std::sync::Arc;

/// A category together with the products the matcher assigns to it
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryListing {
    pub category: Category,
    pub products: Vec<Product>,
}

pub struct StorefrontApi {
    backend: Arc<dyn Backend>,
    auth: Arc<dyn AuthProvider>,
    matcher: CategoryMatcher,
    product_limit: Option<usize>,
}

impl std::fmt::Debug for StorefrontApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontApi")
            .field("matcher", &self.matcher)
            .field("product_limit", &self.product_limit)
            .finish()
    }
}

fn decode<T: DeserializeOwned>(row: Value) -> AppResult<T> {
    Ok(serde_json::from_value(row)?)
}

impl StorefrontApi {
    pub fn new(backend: Arc<dyn Backend>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            backend,
            auth,
            matcher: CategoryMatcher::default(),
            product_limit: None,
        }
    }

    /// API over the hosted backend described by `config`
    pub fn from_config(config: &StorefrontConfig) -> AppResult<Self> {
        let rest = Arc::new(RestBackend::new(
            config.backend_url.clone(),
            config.backend_anon_key.clone(),
            config.request_timeout(),
        )?);
        let matcher = CategoryMatcher::new(config.synonym_table()?);
        Ok(Self::new(rest.clone(), rest)
            .with_matcher(matcher)
            .with_product_limit(config.product_fetch_limit))
    }

    pub fn with_matcher(mut self, matcher: CategoryMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_product_limit(mut self, limit: Option<usize>) -> Self {
        self.product_limit = limit;
        self
    }

    pub fn matcher(&self) -> &CategoryMatcher {
        &self.matcher
    }

    // ========== Products ==========

    /// All products ordered by name
    ///
    /// Rows that do not decode are skipped with a warning.
    pub async fn get_products(&self) -> AppResult<Vec<Product>> {
        let query = Query::new()
            .order_by("name", true)
            .limit(self.product_limit);
        let rows = self.backend.select(tables::PRODUCTS, &query).await?;

        let total = rows.len();
        let products: Vec<Product> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<ProductRow>(row) {
                Ok(row) => Some(Product::from(row)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed product row");
                    None
                }
            })
            .collect();

        tracing::debug!(total, decoded = products.len(), "Fetched products");
        Ok(products)
    }

    /// Products belonging to the category titled `category_title`, in name order
    pub async fn get_products_by_category(&self, category_title: &str) -> AppResult<Vec<Product>> {
        let products = self.get_products().await?;
        Ok(self
            .matcher
            .partition(&products, category_title)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Category page: look the slug up, then list its products
    pub async fn category_listing(
        &self,
        categories: &CategoryStore,
        slug: &str,
    ) -> AppResult<CategoryListing> {
        let category = categories.get_by_slug(slug).ok_or_else(|| {
            AppError::new(ErrorCode::CategoryNotFound).with_detail("slug", slug)
        })?;
        let products = self.get_products_by_category(&category.title).await?;
        Ok(CategoryListing { category, products })
    }

    /// Admin seeding of the product catalog
    pub async fn seed_products(&self, products: Vec<ProductCreate>) -> AppResult<Vec<Product>> {
        self.require_admin().await?;

        if let Some(bad) = products.iter().find(|p| p.price <= rust_decimal::Decimal::ZERO) {
            return Err(AppError::new(ErrorCode::ProductInvalidPrice)
                .with_detail("name", bad.name.clone()));
        }

        let rows = products
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = self.backend.insert(tables::PRODUCTS, rows).await?;
        let products = inserted
            .into_iter()
            .map(|row| decode::<ProductRow>(row).map(Product::from))
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(count = products.len(), "Products seeded");
        Ok(products)
    }

    // ========== Orders ==========

    async fn attach_items(&self, order: &mut Order) -> AppResult<()> {
        let query = Query::new()
            .eq("order_id", &order.id)
            .order_by("id", true);
        order.items = self
            .backend
            .select(tables::ORDER_ITEMS, &query)
            .await?
            .into_iter()
            .map(decode::<OrderItem>)
            .collect::<AppResult<_>>()?;
        Ok(())
    }

    /// The user's orders, newest first, without cancelled ones
    pub async fn get_user_orders(&self, user_id: &str) -> AppResult<Vec<Order>> {
        let query = Query::new()
            .eq("user_id", user_id)
            .neq("status", OrderStatus::Cancelled.as_str())
            .order_by("created_at", false);
        let rows = self.backend.select(tables::ORDERS, &query).await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let mut order: Order = decode(row)?;
            self.attach_items(&mut order).await?;
            orders.push(order);
        }
        Ok(orders)
    }

    pub async fn get_order(&self, id: &str) -> AppResult<Order> {
        let row = self
            .backend
            .select(tables::ORDERS, &Query::new().eq("id", id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::order_not_found(id))?;

        let mut order: Order = decode(row)?;
        self.attach_items(&mut order).await?;
        Ok(order)
    }

    /// Insert a `pending` order, then its items
    pub async fn create_order(&self, data: OrderCreate) -> AppResult<Order> {
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }

        let mut row = serde_json::to_value(&data)?;
        if let Value::Object(fields) = &mut row {
            fields.insert("status".into(), Value::from(OrderStatus::Pending.as_str()));
        }
        let stored = self
            .backend
            .insert(tables::ORDERS, vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::database("Order insert returned no row"))?;
        let order_id = stored.get("id").cloned().unwrap_or(Value::Null);
        let mut order: Order = decode(stored)?;

        let mut item_rows = Vec::with_capacity(data.items.len());
        for item in &data.items {
            let mut item_row = serde_json::to_value(item)?;
            if let Value::Object(fields) = &mut item_row {
                fields.insert("order_id".into(), order_id.clone());
            }
            item_rows.push(item_row);
        }
        let stored_items = match self.backend.insert(tables::ORDER_ITEMS, item_rows).await {
            Ok(rows) => rows,
            Err(e) => {
                self.discard_order(&order.id).await;
                return Err(e.into());
            }
        };
        order.items = stored_items
            .into_iter()
            .map(decode::<OrderItem>)
            .collect::<AppResult<_>>()?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = order.items.len(),
            total = %order.total,
            "Order created"
        );
        Ok(order)
    }

    /// Best-effort removal of an order whose items could not be stored
    async fn discard_order(&self, id: &str) {
        match self
            .backend
            .delete(tables::ORDERS, &[Filter::eq("id", id)])
            .await
        {
            Ok(_) => tracing::warn!(order_id = id, "Order items failed to store, order discarded"),
            Err(e) => {
                tracing::error!(order_id = id, error = %e, "Failed to discard order without items")
            }
        }
    }

    /// Cancel an order that has not shipped yet
    pub async fn cancel_order(&self, id: &str) -> AppResult<Order> {
        let mut order = self.get_order(id).await?;
        match order.status {
            OrderStatus::Cancelled => {
                return Err(AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("id", id));
            }
            status if !status.can_cancel() => {
                return Err(AppError::new(ErrorCode::OrderNotCancellable)
                    .with_detail("id", id)
                    .with_detail("status", status.as_str()));
            }
            _ => {}
        }

        let patch = serde_json::json!({ "status": OrderStatus::Cancelled.as_str() });
        let updated = self
            .backend
            .update(tables::ORDERS, patch, &[Filter::eq("id", id)])
            .await?;
        if updated.is_empty() {
            return Err(AppError::order_not_found(id));
        }

        order.status = OrderStatus::Cancelled;
        tracing::info!(order_id = id, "Order cancelled");
        Ok(order)
    }

    /// Delete an order and its items
    pub async fn delete_order(&self, id: &str) -> AppResult<()> {
        self.backend
            .delete(tables::ORDER_ITEMS, &[Filter::eq("order_id", id)])
            .await?;
        let removed = self
            .backend
            .delete(tables::ORDERS, &[Filter::eq("id", id)])
            .await?;
        if removed == 0 {
            return Err(AppError::order_not_found(id));
        }
        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }

    // ========== Auth ==========

    async fn load_profile(&self, user_id: &str) -> AppResult<Option<Profile>> {
        let row = self
            .backend
            .select(tables::PROFILES, &Query::new().eq("id", user_id))
            .await?
            .into_iter()
            .next();
        Ok(row.and_then(|row| match serde_json::from_value(row) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Ignoring malformed profile row");
                None
            }
        }))
    }

    async fn user_for(&self, session: &Session) -> AppResult<AuthUser> {
        let profile = self.load_profile(&session.user.id).await?;
        Ok(AuthUser::from_session(&session.user, profile))
    }

    /// The signed-in user with their profile, if any
    pub async fn current_user(&self) -> AppResult<Option<AuthUser>> {
        match self.auth.get_session().await? {
            Some(session) => Ok(Some(self.user_for(&session).await?)),
            None => Ok(None),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        let session = self.auth.sign_in(email, password).await?;
        self.user_for(&session).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> AppResult<SignUpOutcome> {
        Ok(self.auth.sign_up(email, password, username).await?)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        Ok(self.auth.sign_out().await?)
    }

    async fn require_admin(&self) -> AppResult<AuthUser> {
        let user = self
            .current_user()
            .await?
            .ok_or_else(AppError::not_authenticated)?;
        if !user.is_admin() {
            return Err(AppError::new(ErrorCode::AdminRequired));
        }
        Ok(user)
    }
}
