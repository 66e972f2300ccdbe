//! Attraction reference data and seasonal weather patterns.
//!
//! Attractions are owned by the wider tourism catalog; the weather routes
//! only need slug lookups. Seasonal patterns belong to an attraction and are
//! removed with it. Both are maintained administratively, either in code or
//! from a JSON seed file at startup.

use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::models::{AttractionLocation, NewSeasonalPattern, SeasonalWeatherPattern};

/// Read-only attraction lookup used for location resolution
pub trait AttractionDirectory: Send + Sync {
    fn find_by_slug(&self, slug: &str) -> Option<AttractionLocation>;
}

/// Read path for seasonal weather patterns
pub trait SeasonalPatternStore: Send + Sync {
    /// Patterns of one attraction, most recently created first
    fn list_by_attraction(&self, slug: &str) -> Vec<SeasonalWeatherPattern>;
}

#[derive(Default)]
pub struct InMemoryAttractionDirectory {
    attractions: RwLock<HashMap<String, AttractionLocation>>,
}

impl InMemoryAttractionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an attraction
    pub fn insert(&self, attraction: AttractionLocation) {
        let mut attractions = self.attractions.write().unwrap_or_else(|p| p.into_inner());
        attractions.insert(attraction.slug.clone(), attraction);
    }

    pub fn remove(&self, slug: &str) -> Option<AttractionLocation> {
        let mut attractions = self.attractions.write().unwrap_or_else(|p| p.into_inner());
        attractions.remove(slug)
    }

    pub fn len(&self) -> usize {
        self.attractions
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttractionDirectory for InMemoryAttractionDirectory {
    fn find_by_slug(&self, slug: &str) -> Option<AttractionLocation> {
        let attractions = self.attractions.read().unwrap_or_else(|p| p.into_inner());
        attractions.get(slug).cloned()
    }
}

#[derive(Default)]
struct PatternTable {
    next_id: u64,
    rows: Vec<SeasonalWeatherPattern>,
}

#[derive(Default)]
pub struct InMemorySeasonalPatterns {
    table: RwLock<PatternTable>,
}

impl InMemorySeasonalPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a validated pattern, stamping id and creation time.
    pub fn insert(
        &self,
        pattern: NewSeasonalPattern,
    ) -> Result<SeasonalWeatherPattern, CatalogError> {
        pattern.validate().map_err(CatalogError::InvalidPattern)?;

        let mut table = self.table.write().unwrap_or_else(|p| p.into_inner());
        table.next_id += 1;
        let stored = SeasonalWeatherPattern {
            id: table.next_id,
            attraction: pattern.attraction,
            season_type: pattern.season_type,
            start_month: pattern.start_month,
            end_month: pattern.end_month,
            avg_temperature: pattern.avg_temperature,
            avg_rainfall: pattern.avg_rainfall,
            description: pattern.description,
            created_at: Utc::now(),
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    /// Drop every pattern owned by `slug`, returning how many were removed.
    pub fn delete_for_attraction(&self, slug: &str) -> usize {
        let mut table = self.table.write().unwrap_or_else(|p| p.into_inner());
        let before = table.rows.len();
        table.rows.retain(|p| p.attraction != slug);
        before - table.rows.len()
    }

    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .rows
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeasonalPatternStore for InMemorySeasonalPatterns {
    fn list_by_attraction(&self, slug: &str) -> Vec<SeasonalWeatherPattern> {
        let table = self.table.read().unwrap_or_else(|p| p.into_inner());
        let mut patterns: Vec<_> = table
            .rows
            .iter()
            .filter(|p| p.attraction == slug)
            .cloned()
            .collect();
        patterns.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        patterns
    }
}

/// Errors raised while maintaining or loading the catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid seasonal pattern: {0}")]
    InvalidPattern(String),

    #[error("Seasonal pattern references unknown attraction '{0}'")]
    UnknownAttraction(String),
}

/// Shape of the startup seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub attractions: Vec<AttractionLocation>,
    #[serde(default)]
    pub seasonal_patterns: Vec<NewSeasonalPattern>,
}

/// Attractions plus their seasonal patterns, kept consistent with each other
#[derive(Clone, Default)]
pub struct Catalog {
    pub attractions: Arc<InMemoryAttractionDirectory>,
    pub patterns: Arc<InMemorySeasonalPatterns>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for attraction in seed.attractions {
            catalog.attractions.insert(attraction);
        }
        for pattern in seed.seasonal_patterns {
            catalog.add_pattern(pattern)?;
        }
        Ok(catalog)
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        let catalog = Self::from_seed(seed)?;

        info!(
            path = %path.display(),
            attractions = catalog.attractions.len(),
            "Loaded tourism catalog seed"
        );
        Ok(catalog)
    }

    /// Add a seasonal pattern for an attraction already in the directory.
    pub fn add_pattern(
        &self,
        pattern: NewSeasonalPattern,
    ) -> Result<SeasonalWeatherPattern, CatalogError> {
        if self.attractions.find_by_slug(&pattern.attraction).is_none() {
            return Err(CatalogError::UnknownAttraction(pattern.attraction));
        }
        self.patterns.insert(pattern)
    }

    /// Remove an attraction together with its seasonal patterns.
    pub fn remove_attraction(&self, slug: &str) -> bool {
        let removed = self.attractions.remove(slug).is_some();
        if removed {
            let patterns = self.patterns.delete_for_attraction(slug);
            info!(slug = %slug, patterns, "Removed attraction and its seasonal patterns");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kilimanjaro() -> AttractionLocation {
        AttractionLocation {
            slug: "kilimanjaro".to_string(),
            name: "Kilimanjaro".to_string(),
            latitude: -3.0674,
            longitude: 37.3556,
        }
    }

    fn season(
        attraction: &str,
        season_type: &str,
        start_month: u8,
        end_month: u8,
    ) -> NewSeasonalPattern {
        NewSeasonalPattern {
            attraction: attraction.to_string(),
            season_type: season_type.to_string(),
            start_month,
            end_month,
            avg_temperature: 18.0,
            avg_rainfall: 5.0,
            description: String::new(),
        }
    }

    fn add(catalog: &Catalog, pattern: NewSeasonalPattern) -> SeasonalWeatherPattern {
        catalog.add_pattern(pattern).unwrap()
    }

    #[test]
    fn test_directory_lookup() {
        let directory = InMemoryAttractionDirectory::new();
        directory.insert(kilimanjaro());
        assert_eq!(directory.find_by_slug("kilimanjaro"), Some(kilimanjaro()));
        assert!(directory.find_by_slug("serengeti").is_none());
    }

    #[test]
    fn test_patterns_are_listed_newest_first() {
        let catalog = Catalog::new();
        catalog.attractions.insert(kilimanjaro());
        let dry = add(&catalog, season("kilimanjaro", "dry", 6, 10));
        let wet = add(&catalog, season("kilimanjaro", "wet", 3, 5));

        let listed = catalog.patterns.list_by_attraction("kilimanjaro");
        let ids: Vec<u64> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![wet.id, dry.id]);
    }

    #[test]
    fn test_patterns_are_scoped_to_attraction() {
        let catalog = Catalog::new();
        catalog.attractions.insert(kilimanjaro());
        catalog.attractions.insert(AttractionLocation {
            slug: "zanzibar".to_string(),
            name: "Zanzibar".to_string(),
            latitude: -6.1659,
            longitude: 39.2026,
        });
        add(&catalog, season("kilimanjaro", "dry", 6, 10));
        add(&catalog, season("zanzibar", "short_rains", 11, 12));

        let listed = catalog.patterns.list_by_attraction("zanzibar");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].season_type, "short_rains");
    }

    #[test]
    fn test_pattern_for_unknown_attraction_is_rejected() {
        let catalog = Catalog::new();
        let err = catalog.add_pattern(season("nowhere", "dry", 6, 10)).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownAttraction(slug) if slug == "nowhere"));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let catalog = Catalog::new();
        catalog.attractions.insert(kilimanjaro());
        let pattern = season("kilimanjaro", "dry", 0, 10);
        let err = catalog.add_pattern(pattern).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern(_)));
    }

    #[test]
    fn test_removing_attraction_cascades_to_patterns() {
        let catalog = Catalog::new();
        catalog.attractions.insert(kilimanjaro());
        add(&catalog, season("kilimanjaro", "dry", 6, 10));
        add(&catalog, season("kilimanjaro", "wet", 3, 5));

        assert!(catalog.remove_attraction("kilimanjaro"));
        assert!(catalog.attractions.find_by_slug("kilimanjaro").is_none());
        assert!(catalog.patterns.list_by_attraction("kilimanjaro").is_empty());
        assert!(!catalog.remove_attraction("kilimanjaro"));
    }

    #[test]
    fn test_seed_parsing() {
        let seed: SeedData = serde_json::from_str(
            r#"{
                "attractions": [
                    {"slug": "kilimanjaro", "name": "Kilimanjaro",
                     "latitude": -3.0674, "longitude": 37.3556}
                ],
                "seasonal_patterns": [
                    {"attraction": "kilimanjaro", "season_type": "dry", "start_month": 6,
                     "end_month": 10, "avg_temperature": 18.0, "avg_rainfall": 5.0}
                ]
            }"#,
        )
        .unwrap();

        let catalog = Catalog::from_seed(seed).unwrap();
        assert_eq!(catalog.attractions.len(), 1);
        assert_eq!(catalog.patterns.list_by_attraction("kilimanjaro").len(), 1);
    }

    #[test]
    fn test_bundled_seed_file_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/seed.json");
        let catalog = Catalog::from_seed_file(path).unwrap();
        assert_eq!(catalog.attractions.len(), 3);
        assert_eq!(catalog.patterns.list_by_attraction("kilimanjaro").len(), 2);
    }

    #[test]
    fn test_missing_seed_file() {
        let result = Catalog::from_seed_file("/definitely/not/here.json");
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
