//! HTTP request handlers for API endpoints.
//!
//! This module contains the weather handlers under `/api/v1` and the
//! operational endpoints (health, version, metrics).

pub mod health;
pub mod metrics;
pub mod openapi;
pub mod version;
pub mod weather;

pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use version::*;
pub use weather::*;
