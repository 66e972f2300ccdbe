//! Utility functions and helper modules.
//!
//! Client IP and user agent extraction, and route pattern labelling.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
