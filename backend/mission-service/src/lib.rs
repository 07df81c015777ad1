//! Volontär Mission Service
//!
//! HTTP API for volunteer missions: organizations and volunteers register,
//! missions are created with a time window, and volunteers sign up for them.
//! Mission status is derived from the clock on every read.

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod security;
pub mod seed;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
