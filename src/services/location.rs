//! Turns request input into coordinates.
//!
//! An attraction slug takes precedence over raw coordinates; otherwise both
//! `lat` and `lon` must be present and parse as finite, in-range decimals.

use std::sync::Arc;

use crate::models::{AttractionLocation, Location};
use crate::services::catalog::AttractionDirectory;

/// Why a request could not be mapped to a location
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Attraction not found")]
    NotFound { slug: String },

    #[error("Latitude and longitude or attraction slug required")]
    MissingLocation,

    #[error("Invalid {field} '{value}': expected a decimal number")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Resolves locations against the attraction directory
#[derive(Clone)]
pub struct LocationResolver {
    attractions: Arc<dyn AttractionDirectory>,
}

impl LocationResolver {
    pub fn new(attractions: Arc<dyn AttractionDirectory>) -> Self {
        Self { attractions }
    }

    /// Resolve a request's `lat`/`lon`/`attraction` inputs.
    ///
    /// With a slug present the raw coordinates are ignored entirely.
    pub fn resolve(
        &self,
        raw_lat: Option<&str>,
        raw_lon: Option<&str>,
        attraction_slug: Option<&str>,
    ) -> Result<Location, ResolutionError> {
        if let Some(slug) = non_blank(attraction_slug) {
            return self.resolve_attraction(slug).map(|a| a.location());
        }

        match (non_blank(raw_lat), non_blank(raw_lon)) {
            (Some(lat), Some(lon)) => Ok(Location::new(
                parse_coordinate("latitude", lat, 90.0)?,
                parse_coordinate("longitude", lon, 180.0)?,
            )),
            _ => Err(ResolutionError::MissingLocation),
        }
    }

    /// Look an attraction up by slug.
    pub fn resolve_attraction(&self, slug: &str) -> Result<AttractionLocation, ResolutionError> {
        let slug = slug.trim();
        self.attractions
            .find_by_slug(slug)
            .ok_or_else(|| ResolutionError::NotFound {
                slug: slug.to_string(),
            })
    }
}

/// Treat absent and whitespace-only parameters alike.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(field: &'static str, raw: &str, limit: f64) -> Result<f64, ResolutionError> {
    let value: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ResolutionError::InvalidCoordinate {
            field,
            value: raw.to_string(),
        })?;

    if !(-limit..=limit).contains(&value) {
        return Err(ResolutionError::OutOfRange {
            field,
            value,
            min: -limit,
            max: limit,
        });
    }
    Ok(value)
}
