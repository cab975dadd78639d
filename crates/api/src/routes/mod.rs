//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health               - Liveness check
//! GET  /health/ready         - Readiness check (verifies the database)
//!
//! # Orders (requires auth)
//! GET    /orders             - List assembled orders (?tags&limit&page)
//! GET    /orders/{orderId}   - One assembled order
//! POST   /orders             - Create an order (status forced to pending)
//! PUT    /orders/{orderId}   - Replace user/products/status
//! DELETE /orders/{orderId}   - Delete, returning the assembled snapshot
//!
//! # Users
//! GET    /users              - List users (?limit&page, requires auth)
//! GET    /users/{userId}     - One user, by ID or email (self or admin)
//! POST   /users              - Register (no auth required)
//! PUT    /users/{userId}     - Update email/password/roles (self or admin)
//! DELETE /users/{userId}     - Delete (self or admin)
//! ```
//!
//! List endpoints advertise neighboring pages in a `Link` header.

pub mod orders;
pub mod users;

use axum::{
    Router,
    http::{HeaderMap, HeaderValue, header},
    routing::get,
};
use url::Url;

use cantina_core::Pagination;

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route(
            "/{userId}",
            get(users::show).put(users::update).delete(users::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route(
            "/{orderId}",
            get(orders::show).put(orders::update).delete(orders::remove),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/orders", order_routes())
}

/// Build a `Link` header advertising the neighboring pages, when any exist.
pub(crate) fn link_headers(base: Option<Url>, pagination: &Pagination) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(base) = base
        && let Some(value) = pagination.link_header(&base)
        && let Ok(value) = HeaderValue::from_str(&value)
    {
        headers.insert(header::LINK, value);
    }
    headers
}
