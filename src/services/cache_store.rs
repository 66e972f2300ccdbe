//! Persisted current-weather rows keyed by canonical location.
//!
//! The store only upserts and reads; freshness is decided by the caller.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::{CanonicalLocation, WeatherCacheRecord, WeatherSnapshot};

/// Storage for the most recent snapshot per canonical location
pub trait WeatherCacheStore: Send + Sync {
    fn get(&self, location: &CanonicalLocation) -> Option<WeatherCacheRecord>;

    /// Insert or overwrite the row for `location`, returning the stored row.
    fn put(
        &self,
        location: CanonicalLocation,
        snapshot: WeatherSnapshot,
        fetched_at: DateTime<Utc>,
    ) -> WeatherCacheRecord;

    /// All rows in ascending id order
    fn list(&self) -> Vec<WeatherCacheRecord>;

    fn get_by_id(&self, id: u64) -> Option<WeatherCacheRecord>;
}

#[derive(Default)]
struct CacheTable {
    next_id: u64,
    rows: HashMap<CanonicalLocation, WeatherCacheRecord>,
}

/// In-memory weather cache; concurrent upserts to one key are last-write-wins.
#[derive(Default)]
pub struct InMemoryWeatherCache {
    table: RwLock<CacheTable>,
}

impl InMemoryWeatherCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WeatherCacheStore for InMemoryWeatherCache {
    fn get(&self, location: &CanonicalLocation) -> Option<WeatherCacheRecord> {
        let table = self.table.read().unwrap_or_else(|p| p.into_inner());
        table.rows.get(location).cloned()
    }

    fn put(
        &self,
        location: CanonicalLocation,
        snapshot: WeatherSnapshot,
        fetched_at: DateTime<Utc>,
    ) -> WeatherCacheRecord {
        let mut table = self.table.write().unwrap_or_else(|p| p.into_inner());
        let existing_id = table.rows.get(&location).map(|r| r.id);
        let id = match existing_id {
            Some(id) => id,
            None => {
                table.next_id += 1;
                table.next_id
            }
        };
        let record = WeatherCacheRecord::new(id, location, snapshot, fetched_at);
        table.rows.insert(location, record.clone());
        record
    }

    fn list(&self) -> Vec<WeatherCacheRecord> {
        let table = self.table.read().unwrap_or_else(|p| p.into_inner());
        let mut rows: Vec<_> = table.rows.values().cloned().collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    fn get_by_id(&self, id: u64) -> Option<WeatherCacheRecord> {
        let table = self.table.read().unwrap_or_else(|p| p.into_inner());
        table.rows.values().find(|r| r.id == id).cloned()
    }
}
