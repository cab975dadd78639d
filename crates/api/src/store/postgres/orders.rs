//! Order store backed by `PostgreSQL`.
//!
//! The product reference list is stored as a JSONB document (`items`),
//! mirroring the document shape the API exposes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cantina_core::{OrderId, OrderStatus, UserId};

use super::super::{OrderFilter, OrderStore, StoreError};
use crate::models::{NewOrder, Order, OrderItem};

/// Order store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    client: String,
    items: serde_json::Value,
    status: String,
    tags: Option<String>,
    date_entry: DateTime<Utc>,
    date_processed: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, StoreError> {
        let items: Vec<OrderItem> = serde_json::from_value(self.items)
            .map_err(|e| StoreError::DataCorruption(format!("invalid items in database: {e}")))?;

        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e| StoreError::DataCorruption(format!("invalid status in database: {e}")))?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            client: self.client,
            items,
            status,
            tags: self.tags,
            date_entry: self.date_entry,
            date_processed: self.date_processed,
        })
    }
}

fn items_to_json(items: &[OrderItem]) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(items)
        .map_err(|e| StoreError::DataCorruption(format!("failed to serialize items: {e}")))
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, client, items, status, tags, date_entry, date_processed \
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn create(&self, order: &NewOrder) -> Result<OrderId, StoreError> {
        let items = items_to_json(&order.items)?;

        let id = sqlx::query_scalar::<_, OrderId>(
            "INSERT INTO orders (user_id, client, items, status, tags, date_entry) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(order.user_id)
        .bind(&order.client)
        .bind(items)
        .bind(order.status.to_string())
        .bind(order.tags.as_deref())
        .bind(order.date_entry)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: OrderId, order: &Order) -> Result<(), StoreError> {
        let items = items_to_json(&order.items)?;

        let result = sqlx::query(
            "UPDATE orders SET user_id = $1, client = $2, items = $3, status = $4, \
             tags = $5, date_processed = $6 WHERE id = $7",
        )
        .bind(order.user_id)
        .bind(&order.client)
        .bind(items)
        .bind(order.status.to_string())
        .bind(order.tags.as_deref())
        .bind(order.date_processed)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_paged(
        &self,
        filter: &OrderFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, client, items, status, tags, date_entry, date_processed \
             FROM orders WHERE ($1::text IS NULL OR tags = $1) \
             ORDER BY date_entry ASC LIMIT $2 OFFSET $3",
        )
        .bind(filter.tags.as_deref())
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn count(&self, filter: &OrderFilter) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE ($1::text IS NULL OR tags = $1)",
        )
        .bind(filter.tags.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
