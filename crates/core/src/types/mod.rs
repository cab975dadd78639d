//! Core types for Cantina.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod roles;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use roles::Roles;
pub use status::OrderStatus;
