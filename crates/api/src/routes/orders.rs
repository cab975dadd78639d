//! Order route handlers.
//!
//! Every response carries the assembled view: product references resolved
//! into full catalog entries with their quantities.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use cantina_core::{OrderId, OrderStatus, PageQuery, Pagination, UserId};

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::services::{AssembledOrder, CreateOrder, ProductRef, UpdateOrder};
use crate::state::AppState;
use crate::store::OrderFilter;

/// One assembled line: the full catalog entry plus the ordered quantity.
#[derive(Debug, Serialize)]
pub struct OrderLineBody {
    pub product: Product,
    pub qty: u32,
}

/// Assembled order payload.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub client: String,
    pub products: Vec<OrderLineBody>,
    pub status: OrderStatus,
    #[serde(rename = "dateEntry")]
    pub date_entry: DateTime<Utc>,
    #[serde(rename = "dateProcessed", serialize_with = "empty_when_unprocessed")]
    pub date_processed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl OrderResponse {
    fn new(order: AssembledOrder, message: Option<&'static str>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            client: order.client,
            products: order
                .products
                .into_iter()
                .map(|line| OrderLineBody {
                    product: line.product,
                    qty: line.qty,
                })
                .collect(),
            status: order.status,
            date_entry: order.date_entry,
            date_processed: order.date_processed,
            message,
        }
    }
}

/// Unprocessed orders serialize `dateProcessed` as an empty string.
fn empty_when_unprocessed<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(stamp) => stamp.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

/// One product reference in a request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductRefBody {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub qty: u32,
}

impl From<ProductRefBody> for ProductRef {
    fn from(body: ProductRefBody) -> Self {
        Self {
            product_id: body.product_id,
            qty: body.qty,
        }
    }
}

/// Request body for `POST /orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrderBody {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub client: Option<String>,
    pub products: Vec<ProductRefBody>,
    pub tags: Option<String>,
}

/// Request body for `PUT /orders/{orderId}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateOrderBody {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub client: Option<String>,
    pub products: Vec<ProductRefBody>,
    pub status: Option<String>,
}

/// Query parameters for `GET /orders`.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub tags: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// List assembled orders.
///
/// GET /orders?tags&limit&page
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Response, AppError> {
    let service = state.order_service();
    let filter = OrderFilter {
        tags: query.tags.clone(),
    };
    let total = service.count(&filter).await?;
    let pagination = Pagination::from_query(&query.page, total);
    let orders = service
        .list(&filter, pagination.skip(), pagination.limit())
        .await?;

    let body: Vec<OrderResponse> = orders
        .into_iter()
        .map(|order| OrderResponse::new(order, None))
        .collect();
    let headers = super::link_headers(
        list_url(state.config(), query.tags.as_deref()),
        &pagination,
    );
    Ok((headers, Json(body)).into_response())
}

/// Fetch one assembled order.
///
/// GET /orders/{orderId}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service().get(&order_id).await?;
    Ok(Json(OrderResponse::new(order, None)))
}

/// Create an order.
///
/// POST /orders
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Json(body): Json<CreateOrderBody>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .order_service()
        .create(CreateOrder {
            user_id: body.user_id,
            client: body.client,
            products: body.products.into_iter().map(ProductRef::from).collect(),
            tags: body.tags,
        })
        .await?;

    Ok(Json(OrderResponse::new(order, Some("order created"))))
}

/// Update an order.
///
/// PUT /orders/{orderId}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Path(order_id): Path<String>,
    Json(body): Json<UpdateOrderBody>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .order_service()
        .update(
            &order_id,
            UpdateOrder {
                user_id: body.user_id,
                client: body.client,
                products: body.products.into_iter().map(ProductRef::from).collect(),
                status: body.status,
            },
        )
        .await?;

    Ok(Json(OrderResponse::new(order, Some("order updated"))))
}

/// Delete an order, returning the assembled snapshot.
///
/// DELETE /orders/{orderId}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service().delete(&order_id).await?;
    Ok(Json(OrderResponse::new(order, Some("order deleted"))))
}

fn list_url(config: &Config, tags: Option<&str>) -> Option<Url> {
    let mut url = config.base_url.join("/orders").ok()?;
    if let Some(tags) = tags {
        url.query_pairs_mut().append_pair("tags", tags);
    }
    Some(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cantina_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::services::OrderLine;

    fn assembled(date_processed: Option<DateTime<Utc>>) -> AssembledOrder {
        AssembledOrder {
            id: OrderId::generate(),
            user_id: UserId::generate(),
            client: "Acme".to_owned(),
            products: vec![OrderLine {
                product: Product {
                    id: ProductId::generate(),
                    name: "coffee".to_owned(),
                    price: Decimal::new(250, 2),
                    image: None,
                    kind: Some("drinks".to_owned()),
                    date_entry: Utc::now(),
                },
                qty: 2,
            }],
            status: OrderStatus::Pending,
            date_entry: Utc::now(),
            date_processed,
        }
    }

    #[test]
    fn test_unprocessed_order_serializes_empty_date() {
        let json = serde_json::to_value(OrderResponse::new(assembled(None), None)).unwrap();
        assert_eq!(json["dateProcessed"], "");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_processed_order_serializes_timestamp() {
        let json =
            serde_json::to_value(OrderResponse::new(assembled(Some(Utc::now())), None)).unwrap();
        assert_ne!(json["dateProcessed"], "");
        assert!(json["dateProcessed"].is_string());
    }

    #[test]
    fn test_assembled_line_shape() {
        let order = assembled(None);
        let product_id = order.products[0].product.id;
        let json = serde_json::to_value(OrderResponse::new(order, Some("order created"))).unwrap();

        let line = &json["products"][0];
        assert_eq!(line["qty"], 2);
        assert_eq!(line["product"]["_id"], product_id.to_string());
        assert_eq!(line["product"]["name"], "coffee");
        assert_eq!(line["product"]["type"], "drinks");
        assert_eq!(json["message"], "order created");
    }

    #[test]
    fn test_create_body_renames() {
        let body: CreateOrderBody = serde_json::from_str(
            r#"{"userId":"u1","client":"Acme","products":[{"productId":"p1","qty":2}]}"#,
        )
        .unwrap();
        assert_eq!(body.user_id, "u1");
        assert_eq!(body.products.len(), 1);
        assert_eq!(body.products[0].product_id, "p1");
        assert_eq!(body.products[0].qty, 2);
    }

    #[test]
    fn test_bodies_tolerate_missing_fields() {
        // Missing fields become empty values and fail validation in the
        // service with a 400, instead of a deserialization rejection.
        let body: CreateOrderBody = serde_json::from_str("{}").unwrap();
        assert!(body.user_id.is_empty());
        assert!(body.products.is_empty());

        let body: UpdateOrderBody = serde_json::from_str("{}").unwrap();
        assert!(body.status.is_none());
    }
}
