// Series source descriptors
use serde::{Deserialize, Serialize};

/// Describes one series: where to fetch it and how to simulate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub id: String,
    pub name: String,
    pub unit: String,
    /// Column header used when the series is exported.
    pub column: String,
    #[serde(default)]
    pub remote: Option<RemoteEndpoint>,
    pub synthetic: SyntheticSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    pub url: String,
    #[serde(default)]
    pub parse: ParseRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseRule {
    /// Raw preamble lines dropped before the CSV body.
    #[serde(default)]
    pub header_rows: usize,
    #[serde(default = "default_true")]
    pub has_column_header: bool,
    #[serde(default)]
    pub year_column: usize,
    #[serde(default = "default_value_column")]
    pub value_column: usize,
    #[serde(default = "default_divisor")]
    pub value_divisor: f64,
    #[serde(default)]
    pub missing_sentinel: Option<f64>,
}

impl Default for ParseRule {
    fn default() -> Self {
        Self {
            header_rows: 0,
            has_column_header: true,
            year_column: 0,
            value_column: default_value_column(),
            value_divisor: default_divisor(),
            missing_sentinel: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_value_column() -> usize {
    1
}

fn default_divisor() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntheticSpec {
    /// Seeded random walk with drift and an optional sinusoid.
    Trend {
        seed: u64,
        start_year: i32,
        #[serde(default)]
        end_year: Option<i32>,
        base: f64,
        drift: f64,
        #[serde(default)]
        noise: f64,
        #[serde(default)]
        amplitude: f64,
        #[serde(default)]
        period: u32,
    },
    /// Hand-authored simulated values.
    Table { points: Vec<TablePoint> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TablePoint {
    pub year: i32,
    pub value: f64,
}

impl SourceSpec {
    /// Checks that the fallback can always produce a non-empty series.
    pub fn validate(&self, current_year: i32) -> anyhow::Result<()> {
        if let Some(remote) = &self.remote {
            if remote.parse.value_divisor == 0.0 {
                anyhow::bail!("source {}: value_divisor must not be zero", self.id);
            }
        }

        match &self.synthetic {
            SyntheticSpec::Trend {
                start_year,
                end_year,
                noise,
                ..
            } => {
                let end = end_year.unwrap_or(current_year);
                if *start_year > end {
                    anyhow::bail!(
                        "source {}: synthetic start_year {} is after end year {}",
                        self.id,
                        start_year,
                        end
                    );
                }
                if !noise.is_finite() || *noise < 0.0 {
                    anyhow::bail!(
                        "source {}: synthetic noise must be a non-negative number",
                        self.id
                    );
                }
            }
            SyntheticSpec::Table { points } => {
                if points.is_empty() {
                    anyhow::bail!("source {}: synthetic table has no points", self.id);
                }
            }
        }

        Ok(())
    }
}

/// Heatwave count and reported psychological impact for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionHeatwave {
    pub region: String,
    pub heatwave_days: u32,
    pub impact: String,
}
