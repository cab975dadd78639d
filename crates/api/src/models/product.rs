//! Product domain types.
//!
//! Products are the menu catalog. This service only reads them; the catalog
//! is owned by an external component.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cantina_core::ProductId;

/// A menu product (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Optional image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Menu section (e.g. "breakfast", "drinks").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// When the product entered the catalog.
    #[serde(rename = "dateEntry")]
    pub date_entry: DateTime<Utc>,
}
