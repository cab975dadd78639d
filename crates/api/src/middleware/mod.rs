//! HTTP middleware for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Identity decoding (bearer token -> request extension)

pub mod auth;

pub use auth::{Claims, RequireAuth, attach_identity};
