// Year-indexed series domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("invalid year range: {lo} is after {hi}")]
    InvalidRange { lo: i32, hi: i32 },

    #[error("smoothing window must be at least 1, got {window}")]
    InvalidWindow { window: usize },

    #[error("duplicate year {0} in series")]
    DuplicateYear(i32),

    #[error("years out of order: {previous} followed by {next}")]
    UnorderedYears { previous: i32, next: i32 },

    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("no admissible rows in source data")]
    NoRows,

    #[error("{source_id} data could not be loaded ({reason}); showing simulated data instead")]
    DataUnavailable { source_id: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: Option<f64>,
}

impl YearPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self {
            year,
            value: Some(value),
        }
    }

    pub fn missing(year: i32) -> Self {
        Self { year, value: None }
    }
}

/// Ascending, duplicate-free sequence of yearly values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: Vec<YearPoint>,
}

impl TimeSeries {
    pub fn new(points: Vec<YearPoint>) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            let (previous, next) = (pair[0].year, pair[1].year);
            if previous == next {
                return Err(SeriesError::DuplicateYear(next));
            }
            if previous > next {
                return Err(SeriesError::UnorderedYears { previous, next });
            }
        }
        Ok(Self { points })
    }

    /// Builds a series from a year map; keys are already unique and sorted.
    pub fn from_year_map(values: BTreeMap<i32, f64>) -> Self {
        Self {
            points: values
                .into_iter()
                .map(|(year, value)| YearPoint::new(year, value))
                .collect(),
        }
    }

    pub fn points(&self) -> &[YearPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().map(|p| p.year)
    }

    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .and_then(|idx| self.points[idx].value)
    }

    /// First and last year, if any.
    pub fn bounds(&self) -> Option<YearRange> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some(YearRange {
                lo: first.year,
                hi: last.year,
            }),
            _ => None,
        }
    }

    // Callers must keep the year axis untouched.
    pub(crate) fn with_points(points: Vec<YearPoint>) -> Self {
        Self { points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub lo: i32,
    pub hi: i32,
}

impl YearRange {
    pub fn new(lo: i32, hi: i32) -> Result<Self, SeriesError> {
        if lo > hi {
            return Err(SeriesError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lo <= year && year <= self.hi
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Real,
    Synthetic,
}

/// A fetched series tagged with where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SourcedSeries {
    pub source_id: String,
    pub series: TimeSeries,
    pub provenance: Provenance,
    pub notice: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl SourcedSeries {
    pub fn real(source_id: &str, series: TimeSeries, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source_id: source_id.to_string(),
            series,
            provenance: Provenance::Real,
            notice: None,
            fetched_at,
        }
    }

    pub fn synthetic(
        source_id: &str,
        series: TimeSeries,
        notice: Option<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_id: source_id.to_string(),
            series,
            provenance: Provenance::Synthetic,
            notice,
            fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_years() {
        let points = vec![YearPoint::new(2000, 1.0), YearPoint::new(2000, 2.0)];
        assert_eq!(TimeSeries::new(points), Err(SeriesError::DuplicateYear(2000)));
    }

    #[test]
    fn test_rejects_unordered_years() {
        let points = vec![YearPoint::new(2001, 1.0), YearPoint::new(2000, 2.0)];
        assert_eq!(
            TimeSeries::new(points),
            Err(SeriesError::UnorderedYears {
                previous: 2001,
                next: 2000
            })
        );
    }

    #[test]
    fn test_bounds_and_lookup() {
        let series = TimeSeries::new(vec![
            YearPoint::new(1990, 0.4),
            YearPoint::missing(1991),
            YearPoint::new(1995, 0.6),
        ])
        .unwrap();

        assert_eq!(series.bounds(), Some(YearRange { lo: 1990, hi: 1995 }));
        assert_eq!(series.value_at(1995), Some(0.6));
        assert_eq!(series.value_at(1991), None);
        assert_eq!(series.value_at(1992), None);
        assert_eq!(TimeSeries::default().bounds(), None);
    }

    #[test]
    fn test_year_range_rejects_inverted_bounds() {
        assert_eq!(
            YearRange::new(2020, 2010),
            Err(SeriesError::InvalidRange { lo: 2020, hi: 2010 })
        );
        assert!(YearRange::new(2010, 2010).unwrap().contains(2010));
    }

    #[test]
    fn test_series_serializes_missing_as_null() {
        let series =
            TimeSeries::new(vec![YearPoint::missing(2000), YearPoint::new(2001, 1.5)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"year":2000,"value":null},{"year":2001,"value":1.5}]"#);
    }
}
