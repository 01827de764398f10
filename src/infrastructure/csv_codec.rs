// CSV parsing for remote series and CSV export of derived series
use crate::domain::source::ParseRule;
use crate::domain::time_series::{SeriesError, TimeSeries};
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};

/// Parse a remote CSV body into a yearly series.
///
/// Drops `rule.header_rows` raw lines, then reads the configured year and
/// value columns. Years come as `YYYY` or `YYYYMM`; rows dated after
/// `current_year` are discarded and rows sharing a year are averaged.
pub fn parse_series_csv(
    text: &str,
    rule: &ParseRule,
    current_year: i32,
) -> Result<TimeSeries, SeriesError> {
    let body = text
        .lines()
        .skip(rule.header_rows)
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(rule.has_column_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut totals: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|e| SeriesError::MalformedRow {
            row,
            reason: e.to_string(),
        })?;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let year_token = record
            .get(rule.year_column)
            .ok_or_else(|| malformed(row, format!("missing year column {}", rule.year_column)))?;
        let year = parse_year(year_token).map_err(|reason| malformed(row, reason))?;

        let value_token = record
            .get(rule.value_column)
            .ok_or_else(|| malformed(row, format!("missing value column {}", rule.value_column)))?;
        let value: f64 = value_token
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| malformed(row, format!("value {:?} is not a number", value_token)))?;

        if rule.missing_sentinel.is_some_and(|sentinel| value == sentinel) {
            continue;
        }
        if year > current_year {
            continue;
        }

        let entry = totals.entry(year).or_insert((0.0, 0));
        entry.0 += value / rule.value_divisor;
        entry.1 += 1;
    }

    if totals.is_empty() {
        return Err(SeriesError::NoRows);
    }

    Ok(TimeSeries::from_year_map(
        totals
            .into_iter()
            .map(|(year, (sum, count))| (year, sum / count as f64))
            .collect(),
    ))
}

fn malformed(row: usize, reason: String) -> SeriesError {
    SeriesError::MalformedRow { row, reason }
}

/// `YYYY` or `YYYYMM` to a calendar year.
fn parse_year(token: &str) -> Result<i32, String> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("year {:?} is not numeric", token));
    }

    match token.len() {
        4 => token
            .parse()
            .map_err(|_| format!("year {:?} is out of range", token)),
        6 => {
            let month: u32 = token[4..]
                .parse()
                .map_err(|_| format!("month in {:?} is not numeric", token))?;
            if !(1..=12).contains(&month) {
                return Err(format!("month {} in {:?} is out of range", month, token));
            }
            token[..4]
                .parse()
                .map_err(|_| format!("year {:?} is out of range", token))
        }
        _ => Err(format!("year {:?} must be YYYY or YYYYMM", token)),
    }
}

/// Write `year,<column>...` rows, outer-joined on year. Missing values are
/// left empty; present values use shortest round-trip formatting.
pub fn write_series_csv(columns: &[(&str, &TimeSeries)]) -> anyhow::Result<Vec<u8>> {
    let years: BTreeSet<i32> = columns
        .iter()
        .flat_map(|(_, series)| series.years())
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["year"];
    header.extend(columns.iter().map(|(name, _)| *name));
    writer.write_record(&header).context("Failed to write CSV header")?;

    for year in years {
        let mut record = vec![year.to_string()];
        record.extend(columns.iter().map(|(_, series)| {
            series
                .value_at(year)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {}", year))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e))
}
