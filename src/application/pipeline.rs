// Derived series pipeline - Year-range filtering and centered smoothing
use crate::domain::time_series::{SeriesError, TimeSeries, YearPoint, YearRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    pub range: YearRange,
    pub smooth: bool,
    pub window: usize,
}

/// Filter `series` to `[lo, hi]`, then optionally apply a centered moving
/// average of width `window` to the filtered points.
pub fn derive(
    series: &TimeSeries,
    range: (i32, i32),
    smooth: bool,
    window: usize,
) -> Result<TimeSeries, SeriesError> {
    let range = YearRange::new(range.0, range.1)?;
    if window < 1 {
        return Err(SeriesError::InvalidWindow { window });
    }

    let filtered = filter_range(series, range);
    if smooth {
        Ok(moving_average(&filtered, window))
    } else {
        Ok(filtered)
    }
}

/// Derive each series independently over the same range.
pub fn derive_many(
    series: &[&TimeSeries],
    options: DeriveOptions,
) -> Result<Vec<TimeSeries>, SeriesError> {
    series
        .iter()
        .map(|s| {
            derive(
                s,
                (options.range.lo, options.range.hi),
                options.smooth,
                options.window,
            )
        })
        .collect()
}

/// Years covered by every input, if they overlap at all.
pub fn overlap(series: &[&TimeSeries]) -> Option<YearRange> {
    let mut bounds = series.iter().map(|s| s.bounds());
    let first = bounds.next()??;
    bounds.try_fold(first, |acc, next| {
        let next = next?;
        let lo = acc.lo.max(next.lo);
        let hi = acc.hi.min(next.hi);
        (lo <= hi).then_some(YearRange { lo, hi })
    })
}

fn filter_range(series: &TimeSeries, range: YearRange) -> TimeSeries {
    TimeSeries::with_points(
        series
            .points()
            .iter()
            .filter(|p| range.contains(p.year))
            .copied()
            .collect(),
    )
}

// Window covers i - w/2 ..= i + (w - 1 - w/2); incomplete windows are missing.
fn moving_average(series: &TimeSeries, window: usize) -> TimeSeries {
    let points = series.points();
    let before = window / 2;
    let after = window - 1 - before;

    let smoothed = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if i < before || i + after >= points.len() {
                return YearPoint::missing(point.year);
            }
            let values: Option<Vec<f64>> = points[i - before..=i + after]
                .iter()
                .map(|p| p.value)
                .collect();
            match values {
                Some(values) => YearPoint::new(
                    point.year,
                    values.iter().sum::<f64>() / values.len() as f64,
                ),
                None => YearPoint::missing(point.year),
            }
        })
        .collect();

    TimeSeries::with_points(smoothed)
}
