//! Business logic services for the Cantina API.
//!
//! # Services
//!
//! - `authz` - Pure authorization predicates for the user resource
//! - `users` - Registration, mutation, and access-controlled reads
//! - `orders` - Order assembly, lifecycle validation, and CRUD orchestration
//!
//! Services receive their store clients as trait objects, so tests substitute
//! in-memory implementations without touching a database.

pub mod authz;
pub mod orders;
pub mod users;

pub use orders::{
    AssembledOrder, CreateOrder, OrderError, OrderLine, OrderService, ProductRef, UpdateOrder,
};
pub use users::{RegisterUser, UserChanges, UserError, UserService};
