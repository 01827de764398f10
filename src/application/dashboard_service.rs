// Dashboard service - Use case for building chart-ready dashboards
use crate::application::error::ServiceError;
use crate::application::pipeline::{self, DeriveOptions};
use crate::application::series_source::SeriesSource;
use crate::domain::dashboard::{
    Axis, Bar, BarChartData, ChartData, ChartKind, Dashboard, Note, SeriesData,
};
use crate::domain::source::{RegionHeatwave, SourceSpec};
use crate::domain::time_series::{Provenance, SourcedSeries, TimeSeries, YearRange};
use crate::infrastructure::config::DashboardsConfig;
use crate::infrastructure::csv_codec::write_series_csv;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Range and smoothing requested by the viewer; unset bounds default to the
/// data's own span.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SeriesQuery {
    pub from: Option<i32>,
    pub to: Option<i32>,
    #[serde(default)]
    pub smooth: bool,
    pub window: Option<usize>,
}

impl SeriesQuery {
    fn options(&self, bounds: YearRange) -> Result<DeriveOptions, ServiceError> {
        let range = YearRange::new(
            self.from.unwrap_or(bounds.lo),
            self.to.unwrap_or(bounds.hi),
        )?;
        Ok(DeriveOptions {
            range,
            smooth: self.smooth,
            window: self.window.unwrap_or(DEFAULT_SMOOTHING_WINDOW),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub remote: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesView {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub provenance: Provenance,
    pub notice: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub year_bounds: Option<YearRange>,
    pub range: YearRange,
    pub points: TimeSeries,
}

/// A CSV document ready to be served as a download.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<SeriesSource>,
    sources: Arc<Vec<SourceSpec>>,
    regions: Arc<Vec<RegionHeatwave>>,
    dashboards: DashboardsConfig,
}

impl DashboardService {
    pub fn new(
        source: Arc<SeriesSource>,
        sources: Vec<SourceSpec>,
        regions: Vec<RegionHeatwave>,
        dashboards: DashboardsConfig,
    ) -> Self {
        Self {
            source,
            sources: Arc::new(sources),
            regions: Arc::new(regions),
            dashboards,
        }
    }

    pub fn list_sources(&self) -> Vec<SourceSummary> {
        self.sources
            .iter()
            .map(|s| SourceSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                unit: s.unit.clone(),
                remote: s.remote.is_some(),
            })
            .collect()
    }

    fn spec(&self, id: &str) -> Result<&SourceSpec, ServiceError> {
        self.sources
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::UnknownSource(id.to_string()))
    }

    pub async fn series(&self, id: &str, query: SeriesQuery) -> Result<SeriesView, ServiceError> {
        let spec = self.spec(id)?;
        let sourced = self.source.fetch(spec).await;
        let (range, points) = derive_one(&sourced.series, query)?;

        Ok(SeriesView {
            id: spec.id.clone(),
            name: spec.name.clone(),
            unit: spec.unit.clone(),
            provenance: sourced.provenance,
            notice: sourced.notice,
            fetched_at: sourced.fetched_at,
            year_bounds: sourced.series.bounds(),
            range,
            points,
        })
    }

    pub async fn export_series(
        &self,
        id: &str,
        query: SeriesQuery,
    ) -> Result<CsvExport, ServiceError> {
        let spec = self.spec(id)?;
        let sourced = self.source.fetch(spec).await;
        let (_, points) = derive_one(&sourced.series, query)?;

        let body = write_series_csv(&[(spec.column.as_str(), &points)])
            .map_err(|e| ServiceError::Export(format!("{:#}", e)))?;

        Ok(CsvExport {
            file_name: format!("{}.csv", spec.id),
            body,
        })
    }

    pub async fn climate_dashboard(&self, query: SeriesQuery) -> Result<Dashboard, ServiceError> {
        let config = &self.dashboards.climate;
        let spec = self.spec(&config.temperature_source)?;
        let sourced = self.source.fetch(spec).await;

        let bounds = sourced.series.bounds();
        let (range, points) = derive_one(&sourced.series, query)?;

        let mut dashboard = Dashboard::new(config.title.clone(), bounds, Some(range));
        dashboard.notices.extend(sourced.notice.clone());
        dashboard.charts.push(ChartData {
            id: "temperature".to_string(),
            title: "지구 평균 기온 변화".to_string(),
            kind: ChartKind::Line,
            x_title: "연도".to_string(),
            y_title: format!("기온 편차 ({})", spec.unit),
            y2_title: None,
            series: vec![series_data(spec, &sourced, Axis::Primary, points)],
        });

        Ok(dashboard)
    }

    pub async fn youth_dashboard(&self, query: SeriesQuery) -> Result<Dashboard, ServiceError> {
        let config = &self.dashboards.youth;
        let heatwave_spec = self.spec(&config.heatwave_source)?;
        let anxiety_spec = self.spec(&config.anxiety_source)?;

        let heatwave = self.source.fetch(heatwave_spec).await;
        let anxiety = self.source.fetch(anxiety_spec).await;

        let bounds = union_bounds(&heatwave.series, &anxiety.series);
        let mut dashboard = Dashboard::new(config.title.clone(), bounds, None);
        dashboard.notices.extend(heatwave.notice.clone());
        dashboard.notices.extend(anxiety.notice.clone());

        if let Some(bounds) = bounds {
            let options = query.options(bounds)?;
            let mut derived =
                pipeline::derive_many(&[&heatwave.series, &anxiety.series], options)?.into_iter();
            let heatwave_points = derived.next().unwrap_or_default();
            let anxiety_points = derived.next().unwrap_or_default();

            match pipeline::overlap(&[&heatwave_points, &anxiety_points]) {
                Some(shared) if shared != options.range => dashboard.notices.push(format!(
                    "두 지표는 {}~{}년 구간에서만 함께 비교할 수 있습니다.",
                    shared.lo, shared.hi
                )),
                None => dashboard
                    .notices
                    .push("선택한 기간에 두 지표가 겹치는 연도가 없습니다.".to_string()),
                _ => {}
            }

            dashboard.range = Some(options.range);
            dashboard.charts.push(ChartData {
                id: "heatwave_anxiety".to_string(),
                title: "폭염일수와 학생 불안감 지수 변화".to_string(),
                kind: ChartKind::DualAxis,
                x_title: "연도".to_string(),
                y_title: format!("{} ({})", heatwave_spec.name, heatwave_spec.unit),
                y2_title: Some(anxiety_spec.name.clone()),
                series: vec![
                    series_data(heatwave_spec, &heatwave, Axis::Primary, heatwave_points),
                    series_data(anxiety_spec, &anxiety, Axis::Secondary, anxiety_points),
                ],
            });
        }

        if !self.regions.is_empty() {
            dashboard.bar_charts.push(BarChartData {
                id: "regional_heatwave".to_string(),
                title: "주요 도시별 폭염일수".to_string(),
                x_title: "지역".to_string(),
                y_title: "폭염일수 (일)".to_string(),
                bars: self
                    .regions
                    .iter()
                    .map(|r| Bar {
                        label: r.region.clone(),
                        value: f64::from(r.heatwave_days),
                    })
                    .collect(),
            });
            dashboard.notes.extend(self.regions.iter().map(|r| Note {
                heading: r.region.clone(),
                body: r.impact.clone(),
            }));
        }

        Ok(dashboard)
    }

    /// Joined survey table (heatwave days and anxiety index by year).
    pub async fn export_youth(&self, query: SeriesQuery) -> Result<CsvExport, ServiceError> {
        let config = &self.dashboards.youth;
        let heatwave_spec = self.spec(&config.heatwave_source)?;
        let anxiety_spec = self.spec(&config.anxiety_source)?;

        let heatwave = self.source.fetch(heatwave_spec).await;
        let anxiety = self.source.fetch(anxiety_spec).await;

        let (heatwave_points, anxiety_points) =
            match union_bounds(&heatwave.series, &anxiety.series) {
                Some(bounds) => {
                    let options = query.options(bounds)?;
                    let mut derived =
                        pipeline::derive_many(&[&heatwave.series, &anxiety.series], options)?
                            .into_iter();
                    (
                        derived.next().unwrap_or_default(),
                        derived.next().unwrap_or_default(),
                    )
                }
                None => (TimeSeries::default(), TimeSeries::default()),
            };

        let body = write_series_csv(&[
            (heatwave_spec.column.as_str(), &heatwave_points),
            (anxiety_spec.column.as_str(), &anxiety_points),
        ])
        .map_err(|e| ServiceError::Export(format!("{:#}", e)))?;

        Ok(CsvExport {
            file_name: "student_anxiety_data.csv".to_string(),
            body,
        })
    }
}

fn derive_one(
    series: &TimeSeries,
    query: SeriesQuery,
) -> Result<(YearRange, TimeSeries), ServiceError> {
    let Some(bounds) = series.bounds() else {
        // Fetched series are never empty; keep the request's own range.
        let range = YearRange::new(query.from.unwrap_or(0), query.to.unwrap_or(0))?;
        return Ok((range, TimeSeries::default()));
    };

    let options = query.options(bounds)?;
    let points = pipeline::derive(
        series,
        (options.range.lo, options.range.hi),
        options.smooth,
        options.window,
    )?;
    Ok((options.range, points))
}

fn union_bounds(a: &TimeSeries, b: &TimeSeries) -> Option<YearRange> {
    match (a.bounds(), b.bounds()) {
        (Some(a), Some(b)) => Some(YearRange {
            lo: a.lo.min(b.lo),
            hi: a.hi.max(b.hi),
        }),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

fn series_data(
    spec: &SourceSpec,
    sourced: &SourcedSeries,
    axis: Axis,
    points: TimeSeries,
) -> SeriesData {
    SeriesData {
        id: spec.id.clone(),
        name: spec.name.clone(),
        unit: spec.unit.clone(),
        axis,
        provenance: sourced.provenance,
        points: points.points().to_vec(),
    }
}
