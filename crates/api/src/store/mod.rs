//! Store clients for users, products, and orders.
//!
//! The service layer depends on the narrow async contracts defined here, not
//! on the database engine. [`postgres`] provides the production
//! implementations; tests substitute in-memory fakes.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and are applied at startup.

pub mod postgres;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cantina_core::{OrderId, ProductId, UserId};

use crate::models::{NewOrder, NewUser, Order, Product, User};

pub use postgres::{PgOrderStore, PgProductStore, PgUserStore};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Filter for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Match orders carrying exactly this tag; `None` matches all orders.
    pub tags: Option<String>,
}

/// CRUD access to user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create a user and return the store-assigned ID.
    ///
    /// Returns [`StoreError::Conflict`] when the email is already taken.
    async fn create(&self, user: &NewUser) -> Result<UserId, StoreError>;

    /// Replace the mutable fields of an existing user.
    async fn update(&self, id: UserId, user: &User) -> Result<(), StoreError>;

    async fn delete(&self, id: UserId) -> Result<(), StoreError>;

    async fn list_paged(&self, skip: i64, limit: i64) -> Result<Vec<User>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
}

/// CRUD access plus filtered listing for order records.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Create an order and return the store-assigned ID.
    async fn create(&self, order: &NewOrder) -> Result<OrderId, StoreError>;

    /// Replace the stored document for an existing order.
    async fn update(&self, id: OrderId, order: &Order) -> Result<(), StoreError>;

    async fn delete(&self, id: OrderId) -> Result<(), StoreError>;

    async fn list_paged(
        &self,
        filter: &OrderFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Order>, StoreError>;

    async fn count(&self, filter: &OrderFilter) -> Result<i64, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
