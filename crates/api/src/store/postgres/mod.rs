//! `PostgreSQL` store implementations.
//!
//! Queries are bound at runtime; the only compile-time coupling to the schema
//! is the row structs in each submodule.

pub mod orders;
pub mod products;
pub mod users;

pub use orders::PgOrderStore;
pub use products::PgProductStore;
pub use users::PgUserStore;
