//! In-memory store implementations for service tests.
//!
//! These keep the same contracts as the `PostgreSQL` stores but hold their
//! records behind a mutex, so tests never need a database.

use std::sync::Mutex;

use async_trait::async_trait;

use cantina_core::{OrderId, ProductId, UserId};

use super::{OrderFilter, OrderStore, ProductStore, StoreError, UserStore};
use crate::models::{NewOrder, NewUser, Order, Product, User};

/// User store over a plain vector.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<UserId, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        let id = UserId::generate();
        users.push(User {
            id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            roles: user.roles,
        });
        Ok(id)
    }

    async fn update(&self, id: UserId, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id != id && u.email == user.email)
        {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }

        let existing = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        existing.email = user.email.clone();
        existing.password_hash = user.password_hash.clone();
        existing.roles = user.roles;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_paged(&self, skip: i64, limit: i64) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.lock().unwrap().len() as i64)
    }
}

/// Catalog store over a plain vector.
#[derive(Default)]
pub struct MemoryProductStore {
    products: Vec<Product>,
}

impl MemoryProductStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

/// Order store over a plain vector.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderStore {
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Mutex::new(orders),
        }
    }
}

fn matches(filter: &OrderFilter, order: &Order) -> bool {
    filter
        .tags
        .as_deref()
        .is_none_or(|tags| order.tags.as_deref() == Some(tags))
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn create(&self, order: &NewOrder) -> Result<OrderId, StoreError> {
        let id = OrderId::generate();
        self.orders.lock().unwrap().push(Order {
            id,
            user_id: order.user_id,
            client: order.client.clone(),
            items: order.items.clone(),
            status: order.status,
            tags: order.tags.clone(),
            date_entry: order.date_entry,
            date_processed: None,
        });
        Ok(id)
    }

    async fn update(&self, id: OrderId, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap();
        let existing = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        existing.user_id = order.user_id;
        existing.client = order.client.clone();
        existing.items = order.items.clone();
        existing.status = order.status;
        existing.tags = order.tags.clone();
        existing.date_processed = order.date_processed;
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap();
        let before = orders.len();
        orders.retain(|o| o.id != id);
        if orders.len() == before {
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
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| matches(filter, o))
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &OrderFilter) -> Result<i64, StoreError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| matches(filter, o))
            .count() as i64)
    }
}
