// Series source - Remote fetch with deterministic synthetic fallback
use crate::application::series_cache::{CacheKey, SeriesCache};
use crate::application::series_repository::SeriesRepository;
use crate::application::synthetic;
use crate::domain::source::{RemoteEndpoint, SourceSpec};
use crate::domain::time_series::{SeriesError, SourcedSeries, TimeSeries};
use crate::infrastructure::config::prepare_url;
use crate::infrastructure::csv_codec::parse_series_csv;
use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct SeriesSource {
    repository: Arc<dyn SeriesRepository>,
    cache: Mutex<SeriesCache>,
    timeout: Duration,
}

impl SeriesSource {
    pub fn new(
        repository: Arc<dyn SeriesRepository>,
        timeout: Duration,
        cache_ttl: chrono::Duration,
    ) -> Self {
        Self {
            repository,
            cache: Mutex::new(SeriesCache::new(cache_ttl)),
            timeout,
        }
    }

    /// Never fails: any remote problem degrades to the synthetic series.
    pub async fn fetch(&self, spec: &SourceSpec) -> SourcedSeries {
        self.fetch_at(spec, Utc::now()).await
    }

    pub async fn fetch_at(&self, spec: &SourceSpec, now: DateTime<Utc>) -> SourcedSeries {
        let current_year = now.year();

        let Some(remote) = &spec.remote else {
            return SourcedSeries::synthetic(
                &spec.id,
                synthetic::generate(&spec.synthetic, current_year),
                None,
                now,
            );
        };

        let url = expand_url(remote, current_year);
        let key = CacheKey::for_request(spec, &url);

        if let Some(hit) = self.cache.lock().await.get(&key, now) {
            tracing::debug!("Cache hit for source {}", spec.id);
            return SourcedSeries::real(&spec.id, hit.series, hit.fetched_at);
        }
        tracing::debug!("Cache miss for source {}, fetching {}", spec.id, url);

        match self.fetch_remote(remote, &url, current_year).await {
            Ok(series) => {
                tracing::info!("Loaded {} points for source {}", series.len(), spec.id);
                self.cache.lock().await.insert(key, series.clone(), now);
                SourcedSeries::real(&spec.id, series, now)
            }
            Err(e) => {
                let unavailable = SeriesError::DataUnavailable {
                    source_id: spec.id.clone(),
                    reason: format!("{:#}", e),
                };
                tracing::warn!("{}", unavailable);
                SourcedSeries::synthetic(
                    &spec.id,
                    synthetic::generate(&spec.synthetic, current_year),
                    Some(unavailable.to_string()),
                    now,
                )
            }
        }
    }

    async fn fetch_remote(
        &self,
        remote: &RemoteEndpoint,
        url: &str,
        current_year: i32,
    ) -> anyhow::Result<TimeSeries> {
        let body = self.repository.fetch_text(url, self.timeout).await?;
        Ok(parse_series_csv(&body, &remote.parse, current_year)?)
    }
}

fn expand_url(remote: &RemoteEndpoint, current_year: i32) -> String {
    let mut vars = HashMap::new();
    vars.insert("current_year".to_string(), current_year.to_string());
    prepare_url(&remote.url, &vars)
}
