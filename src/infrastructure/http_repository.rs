// HTTP repository implementation for CSV-serving endpoints
use crate::application::series_repository::SeriesRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct HttpSeriesRepository {
    client: reqwest::Client,
}

impl HttpSeriesRepository {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SeriesRepository for HttpSeriesRepository {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!("Fetching series data from {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("Accept", "text/csv")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Series request to {} failed with status {}", url, status);
        }

        response
            .text()
            .await
            .context("Failed to read series response body")
    }
}
