use chrono::NaiveDate;

use crate::error::{ForecastError, Result};
use crate::model::{Series, SeriesRow};

/// `window_length` contiguous rows of a normalized series, viewed through
/// their feature columns only.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    rows: &'a [SeriesRow],
}

impl<'a> Window<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn feature_rows(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        let rows: &'a [SeriesRow] = self.rows;
        rows.iter().map(|r| r.features())
    }

    /// Owned `len × feature_count` copy.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.feature_rows().map(|r| r.to_vec()).collect()
    }
}

/// Supervised pairs in time order: `windows[i]` predicts `targets[i]`.
#[derive(Debug, Clone)]
pub struct WindowSet<'a> {
    pub windows: Vec<Window<'a>>,
    pub targets: Vec<f64>,
}

impl<'a> WindowSet<'a> {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// The most recent window, used to seed a rollout.
    pub fn last_window(&self) -> Option<Window<'a>> {
        self.windows.last().copied()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowBuilder;

impl WindowBuilder {
    /// For every `i` in `0..N - window_length` emit rows `i..i + window_length`
    /// and the target of row `i + window_length`.
    pub fn build(normalized: &Series, window_length: usize) -> Result<WindowSet<'_>> {
        if window_length == 0 {
            return Err(ForecastError::InvalidInput(
                "window length must be > 0".to_string(),
            ));
        }
        let rows = normalized.rows();
        if rows.len() <= window_length {
            return Err(ForecastError::InsufficientData {
                rows: rows.len(),
                window_length,
            });
        }

        let count = rows.len() - window_length;
        let mut windows = Vec::with_capacity(count);
        let mut targets = Vec::with_capacity(count);
        for i in 0..count {
            windows.push(Window {
                rows: &rows[i..i + window_length],
            });
            targets.push(rows[i + window_length].target());
        }

        Ok(WindowSet { windows, targets })
    }
}
