use std::io::Read;

use chrono::NaiveDate;

use crate::error::{ForecastError, Result};
use crate::model::{Series, SeriesRow};

#[derive(Debug, Clone)]
pub struct SeriesCsvOptions {
    pub date_column: String,
    pub date_format: String,
    pub drop_columns: Vec<String>,
    pub target_column: String,
}

impl Default for SeriesCsvOptions {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            date_format: "%d-%m-%Y".to_string(),
            drop_columns: vec!["SO".to_string(), "EMA".to_string()],
            target_column: "CloseNext".to_string(),
        }
    }
}

/// Empty cells and `NaN` are missing values; anything else must parse as a number.
fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}

/// Parse a per-instrument history table.
///
/// Rows whose date does not parse are skipped. Every other kept column must be
/// numeric or missing. Rows are sorted by date before the series is built.
pub fn read_series<R: Read>(reader: R, opts: &SeriesCsvOptions) -> Result<Series> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| ForecastError::DataNotFound(format!("history could not be loaded: {}", e)))?
        .clone();

    let Some(date_idx) = headers.iter().position(|h| h == opts.date_column) else {
        return Err(ForecastError::DataNotFound(format!(
            "required date column '{}' is missing",
            opts.date_column
        )));
    };
    let value_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != date_idx && !opts.drop_columns.iter().any(|d| d == h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| {
            ForecastError::DataNotFound(format!("history could not be loaded: {}", e))
        })?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        let Ok(date) = NaiveDate::parse_from_str(raw_date, &opts.date_format) else {
            skipped += 1;
            continue;
        };

        let mut values = Vec::with_capacity(value_cols.len());
        for (idx, name) in &value_cols {
            let cell = record.get(*idx).unwrap_or_default();
            let v = parse_cell(cell).ok_or_else(|| {
                ForecastError::InvalidInput(format!(
                    "non-numeric value '{}' in column '{}' on data row {}",
                    cell,
                    name,
                    line + 1
                ))
            })?;
            values.push(v);
        }
        rows.push(SeriesRow::new(date, values));
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Dropped rows with unparsable dates");
    }
    rows.sort_by_key(|r| r.date);

    let columns = value_cols.into_iter().map(|(_, name)| name).collect();
    Series::new(columns, rows, &opts.target_column)
}
