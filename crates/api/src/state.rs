//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::{OrderService, UserService};
use crate::store::{
    OrderStore, PgOrderStore, PgProductStore, PgUserStore, ProductStore, UserStore,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands out per-request
/// service instances wired to the shared store clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
    orders: Arc<dyn OrderStore>,
}

impl AppState {
    /// Create application state over `PostgreSQL` store clients.
    #[must_use]
    pub fn new(config: Config, pool: PgPool) -> Self {
        Self::with_stores(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgProductStore::new(pool.clone())),
            Arc::new(PgOrderStore::new(pool)),
        )
    }

    /// Create application state over explicit store clients.
    #[must_use]
    pub fn with_stores(
        config: Config,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                products,
                orders,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Build a user service over the shared stores.
    #[must_use]
    pub fn user_service(&self) -> UserService {
        UserService::new(self.inner.users.clone())
    }

    /// Build an order service over the shared stores.
    #[must_use]
    pub fn order_service(&self) -> OrderService {
        OrderService::new(
            self.inner.orders.clone(),
            self.inner.products.clone(),
            self.inner.users.clone(),
        )
    }
}
