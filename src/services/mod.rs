//! Business logic and service layer modules.
//!
//! This module contains the weather query service and its collaborators:
//! location resolution, the provider client, the in-memory stores,
//! metrics collection and rate limiting.

pub mod cache_store;
pub mod catalog;
pub mod location;
pub mod metrics;
pub mod provider;
pub mod rate_limit;
pub mod resilient_client;
pub mod weather;

pub use cache_store::*;
pub use catalog::*;
pub use location::*;
pub use metrics::*;
pub use provider::*;
pub use rate_limit::*;
pub use weather::*;
