//! Attraction reference data consumed by the weather subsystem.

use serde::{Deserialize, Serialize};

use super::Location;

/// The slice of an attraction the weather routes care about: its slug and where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionLocation {
    pub slug: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AttractionLocation {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}
