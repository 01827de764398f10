// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::{Datelike, Utc};

use crate::application::dashboard_service::DashboardService;
use crate::application::quiz_service::QuizService;
use crate::application::series_source::SeriesSource;
use crate::infrastructure::config::{
    load_app_config, load_quiz_config, load_regions_config, load_sources_config,
};
use crate::infrastructure::http_repository::HttpSeriesRepository;
use crate::infrastructure::logging::init_tracing;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_dir = PathBuf::from(
        std::env::var("CLIMATE_MIND_CONFIG_DIR").unwrap_or_else(|_| "config".to_string()),
    );

    // Load configuration
    let app_config = load_app_config(&config_dir)?;
    init_tracing(&app_config.server.log_level);

    let sources_config = load_sources_config(&config_dir, Utc::now().year())?;
    let regions_config = load_regions_config(&config_dir)?;
    let quiz_config = load_quiz_config(&config_dir)?;
    tracing::info!(
        "Loaded {} sources, {} regions, {} quiz questions from {}",
        sources_config.sources.len(),
        regions_config.regions.len(),
        quiz_config.questions.len(),
        config_dir.display()
    );

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpSeriesRepository::new());

    // Create services (application layer)
    let cache_ttl_secs = i64::try_from(app_config.fetch.cache_ttl_secs)
        .context("fetch.cache_ttl_secs is too large")?;
    let series_source = Arc::new(SeriesSource::new(
        repository,
        Duration::from_secs(app_config.fetch.timeout_secs),
        chrono::Duration::seconds(cache_ttl_secs),
    ));
    let dashboard_service = DashboardService::new(
        series_source,
        sources_config.sources,
        regions_config.regions,
        sources_config.dashboards,
    );
    let quiz_service = QuizService::new(quiz_config.questions);

    let state = Arc::new(AppState {
        dashboard_service,
        quiz_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!("Starting climate-mind-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
