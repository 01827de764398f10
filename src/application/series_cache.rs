// Explicit time-to-live cache for remotely fetched series
use crate::domain::source::SourceSpec;
use crate::domain::time_series::TimeSeries;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_id: String,
    pub params_hash: u64,
}

impl CacheKey {
    /// Keys on the source id plus everything that shapes the fetched data,
    /// so a config change never serves a stale parse.
    pub fn for_request(spec: &SourceSpec, url: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        if let Some(remote) = &spec.remote {
            // ParseRule holds floats, so hash its JSON form.
            serde_json::to_string(&remote.parse)
                .unwrap_or_default()
                .hash(&mut hasher);
        }
        Self {
            source_id: spec.id.clone(),
            params_hash: hasher.finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachedSeries {
    pub series: TimeSeries,
    pub fetched_at: DateTime<Utc>,
}

/// An entry is reusable while `now - fetched_at < ttl`.
pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at) < ttl
}

#[derive(Debug)]
pub struct SeriesCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CachedSeries>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns a fresh entry, evicting it instead if it has expired.
    pub fn get(&mut self, key: &CacheKey, now: DateTime<Utc>) -> Option<CachedSeries> {
        let fresh = self
            .entries
            .get(key)
            .map(|entry| is_fresh(entry.fetched_at, now, self.ttl))?;

        if fresh {
            self.entries.get(key).cloned()
        } else {
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&mut self, key: CacheKey, series: TimeSeries, fetched_at: DateTime<Utc>) {
        self.entries.insert(key, CachedSeries { series, fetched_at });
    }
}
