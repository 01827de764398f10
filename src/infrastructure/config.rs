use crate::domain::quiz::QuizQuestion;
use crate::domain::source::{RegionHeatwave, SourceSpec};
use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const ENV_PREFIX: &str = "CLIMATE_MIND";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
    pub dashboards: DashboardsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardsConfig {
    pub climate: ClimateDashboardConfig,
    pub youth: YouthDashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClimateDashboardConfig {
    pub title: String,
    pub temperature_source: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct YouthDashboardConfig {
    pub title: String,
    pub heatwave_source: String,
    pub anxiety_source: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionsConfig {
    #[serde(default)]
    pub regions: Vec<RegionHeatwave>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

fn load_file<T: DeserializeOwned>(dir: &Path, name: &str) -> anyhow::Result<T> {
    let path = dir.join(name);
    let settings = config::Config::builder()
        .add_source(config::File::with_name(&path.to_string_lossy()))
        .build()
        .with_context(|| format!("Failed to read {}", path.display()))?;

    settings
        .try_deserialize()
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// `app.toml` overlaid with `CLIMATE_MIND__SECTION__KEY` environment variables.
pub fn load_app_config(dir: &Path) -> anyhow::Result<AppConfig> {
    let path = dir.join("app");
    let settings = config::Config::builder()
        .add_source(config::File::with_name(&path.to_string_lossy()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_sources_config(dir: &Path, current_year: i32) -> anyhow::Result<SourcesConfig> {
    let config: SourcesConfig = load_file(dir, "sources")?;

    let mut seen = HashSet::new();
    for spec in &config.sources {
        if !seen.insert(spec.id.as_str()) {
            anyhow::bail!("duplicate source id {}", spec.id);
        }
        spec.validate(current_year)?;
    }

    let referenced = [
        &config.dashboards.climate.temperature_source,
        &config.dashboards.youth.heatwave_source,
        &config.dashboards.youth.anxiety_source,
    ];
    for id in referenced {
        if !seen.contains(id.as_str()) {
            anyhow::bail!("dashboard references unknown source {}", id);
        }
    }

    Ok(config)
}

pub fn load_regions_config(dir: &Path) -> anyhow::Result<RegionsConfig> {
    load_file(dir, "regions")
}

pub fn load_quiz_config(dir: &Path) -> anyhow::Result<QuizConfig> {
    let config: QuizConfig = load_file(dir, "quiz")?;
    if config.questions.is_empty() {
        anyhow::bail!("quiz config has no questions");
    }
    for question in &config.questions {
        question.validate()?;
    }
    Ok(config)
}

/// Replace `${key}` placeholders in a URL template with encoded values
pub fn prepare_url(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
