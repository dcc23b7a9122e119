use chrono::NaiveDate;

use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

impl SeriesRow {
    pub fn new(date: NaiveDate, values: Vec<f64>) -> Self {
        Self { date, values }
    }

    /// Every value except the trailing target.
    pub fn features(&self) -> &[f64] {
        &self.values[..self.values.len().saturating_sub(1)]
    }

    pub fn target(&self) -> f64 {
        self.values.last().copied().unwrap_or(f64::NAN)
    }
}

/// Daily multivariate history for one instrument.
///
/// The target column is always stored last; rows are strictly increasing in
/// date and every row has one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    columns: Vec<String>,
    rows: Vec<SeriesRow>,
}

impl Series {
    /// Build a series, moving `target_column` to the last position.
    pub fn new(columns: Vec<String>, rows: Vec<SeriesRow>, target_column: &str) -> Result<Self> {
        let Some(target_idx) = columns.iter().position(|c| c == target_column) else {
            return Err(ForecastError::DataNotFound(format!(
                "required target column '{}' is missing",
                target_column
            )));
        };
        if columns.len() < 2 {
            return Err(ForecastError::DataNotFound(format!(
                "no feature columns besides target '{}'",
                target_column
            )));
        }

        let width = columns.len();
        for (i, row) in rows.iter().enumerate() {
            if row.values.len() != width {
                return Err(ForecastError::InvalidInput(format!(
                    "row {} ({}) has {} values, expected {}",
                    i,
                    row.date,
                    row.values.len(),
                    width
                )));
            }
        }
        if let Some(pair) = rows.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::InvalidInput(format!(
                "dates must be strictly increasing: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        let mut columns = columns;
        let mut rows = rows;
        if target_idx != width - 1 {
            let target = columns.remove(target_idx);
            columns.push(target);
            for row in &mut rows {
                let v = row.values.remove(target_idx);
                row.values.push(v);
            }
        }

        Ok(Self { columns, rows })
    }

    /// Same columns and dates, new values. Used for the normalized copy.
    pub(crate) fn with_values(&self, values: Vec<Vec<f64>>) -> Self {
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, values)| SeriesRow::new(row.date, values))
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn target_column(&self) -> &str {
        &self.columns[self.columns.len() - 1]
    }

    /// Feature + target column count.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn feature_count(&self) -> usize {
        self.columns.len() - 1
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// `(date, value)` pairs of one column, in time order.
    pub fn column(&self, name: &str) -> Option<Vec<(NaiveDate, f64)>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| (r.date, r.values[idx])).collect())
    }
}
