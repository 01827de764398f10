// Repository trait for remote series data access
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait SeriesRepository: Send + Sync {
    /// Fetch the raw body served at `url`, giving up after `timeout`.
    async fn fetch_text(&self, url: &str, timeout: Duration) -> anyhow::Result<String>;
}
