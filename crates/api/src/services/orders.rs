//! Order assembly, lifecycle validation, and CRUD orchestration.
//!
//! Stored orders hold bare product references. Every read and write resolves
//! those references against the catalog and merges quantities into a
//! client-facing view; an unresolvable reference fails the whole operation,
//! never part of it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future;
use thiserror::Error;

use cantina_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::models::{NewOrder, Order, OrderItem, Product};
use crate::store::{OrderFilter, OrderStore, ProductStore, StoreError, UserStore};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order names a user that does not exist.
    #[error("order references an unknown user")]
    UnknownUser,

    /// The order carries no product references.
    #[error("order must contain at least one product")]
    EmptyProducts,

    /// The order names no client.
    #[error("order must name a client")]
    MissingClient,

    /// A product reference is not a well-formed ID.
    #[error("invalid product reference: {0}")]
    InvalidProductRef(String),

    /// The submitted status is not one of the five accepted values.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// A referenced product cannot be resolved against the catalog.
    #[error("order references an unknown product: {0}")]
    UnknownProduct(ProductId),

    /// No order matches the given ID.
    #[error("order not found")]
    NotFound,

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An unvalidated product reference from a request body.
#[derive(Debug, Clone)]
pub struct ProductRef {
    pub product_id: String,
    pub qty: u32,
}

/// Fields accepted when creating an order.
///
/// Status is not accepted here: new orders are always pending.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: String,
    pub client: Option<String>,
    pub products: Vec<ProductRef>,
    pub tags: Option<String>,
}

/// Fields accepted when updating an order.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    pub user_id: String,
    pub client: Option<String>,
    pub products: Vec<ProductRef>,
    pub status: Option<String>,
}

/// A product reference resolved into the full catalog entry.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: Product,
    pub qty: u32,
}

/// A fully resolved order view.
///
/// The `products` list is an order-preserving transform of the stored
/// reference list: same length, same ID order, each entry enriched with the
/// catalog entry and the original quantity.
#[derive(Debug, Clone)]
pub struct AssembledOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub client: String,
    pub products: Vec<OrderLine>,
    pub status: OrderStatus,
    pub date_entry: DateTime<Utc>,
    pub date_processed: Option<DateTime<Utc>>,
}

impl AssembledOrder {
    fn from_parts(order: Order, products: Vec<OrderLine>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            client: order.client,
            products,
            status: order.status,
            date_entry: order.date_entry,
            date_processed: order.date_processed,
        }
    }
}

/// Order service.
///
/// No locking spans the validate-then-write sequences; a product deleted in
/// between is caught again by re-validation on the next read.
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            orders,
            products,
            users,
        }
    }

    /// Resolve a stored order into its client-facing view.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UnknownProduct` if any reference fails to
    /// resolve; no partial view is produced.
    pub async fn assemble(&self, order: Order) -> Result<AssembledOrder, OrderError> {
        let products = self.resolve_products(&order.items).await?;
        let lines = merge_lines(&order.items, products);
        Ok(AssembledOrder::from_parts(order, lines))
    }

    /// Fetch and assemble one order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for unknown IDs, plus assembly errors.
    pub async fn get(&self, id: &str) -> Result<AssembledOrder, OrderError> {
        let id = parse_order_id(id)?;
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;
        self.assemble(order).await
    }

    /// List and assemble one page of orders.
    ///
    /// # Errors
    ///
    /// Fails with the first assembly error; no partial page is returned.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<AssembledOrder>, OrderError> {
        let orders = self.orders.list_paged(filter, skip, limit).await?;
        future::try_join_all(orders.into_iter().map(|order| self.assemble(order))).await
    }

    /// Total number of orders matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` when the store fails.
    pub async fn count(&self, filter: &OrderFilter) -> Result<i64, OrderError> {
        Ok(self.orders.count(filter).await?)
    }

    /// Create an order. Status is forced to pending, `dateEntry` is stamped
    /// now, and `dateProcessed` starts empty.
    ///
    /// # Errors
    ///
    /// Returns validation errors for a bad user, empty products, missing
    /// client, or unresolvable product references.
    pub async fn create(&self, req: CreateOrder) -> Result<AssembledOrder, OrderError> {
        let user_id = self.require_user(&req.user_id).await?;
        let client = req
            .client
            .filter(|c| !c.trim().is_empty())
            .ok_or(OrderError::MissingClient)?;
        if req.products.is_empty() {
            return Err(OrderError::EmptyProducts);
        }
        let items = parse_items(&req.products)?;
        let products = self.resolve_products(&items).await?;

        let order = NewOrder {
            user_id,
            client,
            items,
            status: OrderStatus::Pending,
            tags: req.tags,
            date_entry: Utc::now(),
        };
        let id = self.orders.create(&order).await?;
        let stored = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let lines = merge_lines(&stored.items, products);
        Ok(AssembledOrder::from_parts(stored, lines))
    }

    /// Replace an order's user, products, and status.
    ///
    /// `dateEntry` is preserved; `dateProcessed` is stamped on every
    /// successful update, including a status re-assertion.
    ///
    /// # Errors
    ///
    /// Returns validation errors before `OrderError::NotFound`: the order
    /// lookup happens only after the body has been validated.
    pub async fn update(&self, id: &str, req: UpdateOrder) -> Result<AssembledOrder, OrderError> {
        let id = parse_order_id(id)?;

        let user_id = self.require_user(&req.user_id).await?;
        if req.products.is_empty() {
            return Err(OrderError::EmptyProducts);
        }
        let raw_status = req.status.unwrap_or_default();
        let status: OrderStatus = raw_status
            .parse()
            .map_err(|_| OrderError::InvalidStatus(raw_status))?;
        let items = parse_items(&req.products)?;
        let products = self.resolve_products(&items).await?;

        let existing = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let updated = Order {
            id,
            user_id,
            client: req.client.unwrap_or(existing.client),
            items,
            status,
            tags: existing.tags,
            date_entry: existing.date_entry,
            date_processed: Some(Utc::now()),
        };
        self.orders.update(id, &updated).await?;
        let stored = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let lines = merge_lines(&stored.items, products);
        Ok(AssembledOrder::from_parts(stored, lines))
    }

    /// Delete an order, returning its assembled view as it existed before
    /// deletion.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for unknown IDs, plus assembly errors.
    pub async fn delete(&self, id: &str) -> Result<AssembledOrder, OrderError> {
        let id = parse_order_id(id)?;
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;
        let assembled = self.assemble(order).await?;
        self.orders.delete(id).await?;
        Ok(assembled)
    }

    /// Resolve every reference against the catalog, concurrently.
    ///
    /// `try_join_all` keeps results in input order regardless of completion
    /// order, which is what makes the assembled view order-preserving.
    async fn resolve_products(&self, items: &[OrderItem]) -> Result<Vec<Product>, OrderError> {
        let lookups = items
            .iter()
            .map(|item| self.products.get_by_id(item.product_id));
        let resolved = future::try_join_all(lookups).await?;

        resolved
            .into_iter()
            .zip(items)
            .map(|(product, item)| product.ok_or(OrderError::UnknownProduct(item.product_id)))
            .collect()
    }

    async fn require_user(&self, raw: &str) -> Result<UserId, OrderError> {
        let id = raw.parse::<UserId>().map_err(|_| OrderError::UnknownUser)?;
        if self.users.get_by_id(id).await?.is_none() {
            return Err(OrderError::UnknownUser);
        }
        Ok(id)
    }
}

fn parse_order_id(raw: &str) -> Result<OrderId, OrderError> {
    raw.parse().map_err(|_| OrderError::NotFound)
}

fn parse_items(refs: &[ProductRef]) -> Result<Vec<OrderItem>, OrderError> {
    refs.iter()
        .map(|r| {
            r.product_id
                .parse::<ProductId>()
                .map(|product_id| OrderItem {
                    product_id,
                    qty: r.qty,
                })
                .map_err(|_| OrderError::InvalidProductRef(r.product_id.clone()))
        })
        .collect()
}

/// Merge resolved products with the reference list they came from.
///
/// Quantity ties back to the first reference carrying the product's ID, so
/// duplicate references all inherit the first entry's quantity.
fn merge_lines(items: &[OrderItem], products: Vec<Product>) -> Vec<OrderLine> {
    products
        .into_iter()
        .zip(items)
        .map(|(product, item)| {
            let qty = items
                .iter()
                .find(|i| i.product_id == product.id)
                .map_or(item.qty, |i| i.qty);
            OrderLine { product, qty }
        })
        .collect()
}
