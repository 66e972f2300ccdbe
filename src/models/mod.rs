//! Data models and schemas for the tourism weather API.
//!
//! This module contains the data structures used throughout the application,
//! including request/response models, weather records, and location types.

pub mod api;
pub mod attraction;
pub mod location;
pub mod weather;

pub use api::*;
pub use attraction::*;
pub use location::*;
pub use weather::*;
