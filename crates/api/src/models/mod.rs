//! Domain models for the Cantina API.
//!
//! These types represent validated domain objects separate from database row
//! types and from the request/response DTOs in `routes`.

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order, OrderItem};
pub use product::Product;
pub use user::{Actor, NewUser, User};
