//! Configuration structures and loading utilities.
//!
//! This module contains all configuration structures used by the application,
//! including environment variable loading and default values.

pub mod metrics;
pub mod rate_limit;
pub mod resilient_client;
pub mod security;
pub mod server;
pub mod weather;

pub use metrics::*;
pub use rate_limit::*;
pub use security::*;
pub use server::*;
pub use weather::*;

/// Serializes tests that mutate process environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
