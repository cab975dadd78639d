//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cantina_core::{OrderId, OrderStatus, ProductId, UserId};

/// A reference to a product with the quantity ordered.
///
/// Serde names match the stored document shape (`productId`/`qty`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub qty: u32,
}

/// A stored order (domain type).
///
/// `items` holds non-owning product references; they are resolved against the
/// catalog on every read and write rather than enforced as foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The staff account that entered the order.
    pub user_id: UserId,
    /// Name of the client the order is for.
    pub client: String,
    /// Product references with quantities; never empty for a valid order.
    pub items: Vec<OrderItem>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Optional free-form tag used by list filtering.
    pub tags: Option<String>,
    /// Set once at creation, immutable thereafter.
    pub date_entry: DateTime<Utc>,
    /// Stamped on every update; empty until the first one.
    pub date_processed: Option<DateTime<Utc>>,
}

/// Fields for an order about to be created; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub client: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub tags: Option<String>,
    pub date_entry: DateTime<Utc>,
}
