//! # Actix Middleware Library
//!
//! Shared middleware for Volontär Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer JWT authentication and identity extractors
//! - `correlation_id`: `x-correlation-id` propagation

pub mod correlation_id;
pub mod jwt_auth;

pub use correlation_id::{CorrelationId, CorrelationIdMiddleware, CORRELATION_ID_HEADER};
pub use jwt_auth::{AuthenticatedUser, JwtAuthMiddleware, UserId};
