//! Token primitives shared by Volontär services.

pub mod jwt;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
