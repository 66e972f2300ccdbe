//! Coordinate value objects and cache-key canonicalization.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed precision of canonical coordinates (4 decimal places, roughly 11 m).
const CANONICAL_SCALE: f64 = 10_000.0;

/// A resolved latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Map this location onto the fixed-precision grid used to key cached weather.
    pub fn canonical(&self) -> CanonicalLocation {
        CanonicalLocation {
            lat_e4: (self.latitude * CANONICAL_SCALE).round() as i64,
            lon_e4: (self.longitude * CANONICAL_SCALE).round() as i64,
        }
    }
}

/// Coordinates scaled to integers so that requests differing only in
/// floating-point noise hash to the same cache row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalLocation {
    lat_e4: i64,
    lon_e4: i64,
}

impl CanonicalLocation {
    pub fn latitude(&self) -> f64 {
        self.lat_e4 as f64 / CANONICAL_SCALE
    }

    pub fn longitude(&self) -> f64 {
        self.lon_e4 as f64 / CANONICAL_SCALE
    }
}

impl fmt::Display for CanonicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude(), self.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_coordinates_share_a_key() {
        let a = Location::new(-3.067_400_1, 37.355_6).canonical();
        let b = Location::new(-3.067_399_9, 37.355_600_04).canonical();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "-3.0674,37.3556");
    }

    #[test]
    fn test_distinct_coordinates_get_distinct_keys() {
        let a = Location::new(-3.0674, 37.3556).canonical();
        let b = Location::new(-3.0675, 37.3556).canonical();
        assert_ne!(a, b);
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let key = Location::new(-0.000_01, 0.000_01).canonical();
        assert_eq!(key, Location::new(0.0, 0.0).canonical());
        assert_eq!(key.to_string(), "0.0000,0.0000");
    }
}
