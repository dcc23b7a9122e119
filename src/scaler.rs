use crate::error::{ForecastError, Result};
use crate::model::Series;

/// Per-column min/max map fitted over features and target together.
///
/// `range` holds `max - min`, with a degenerate (constant or all-missing)
/// column stored as `1.0` so that the inverse stays finite.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerState {
    columns: Vec<String>,
    min: Vec<f64>,
    range: Vec<f64>,
}

impl ScalerState {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Index of the target column, always the last one.
    pub fn target_index(&self) -> usize {
        self.columns.len() - 1
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn range(&self) -> &[f64] {
        &self.range
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.min.iter().zip(&self.range))
            .map(|(x, (min, range))| (x - min) / range)
            .collect()
    }

    pub fn inverse_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.min.iter().zip(&self.range))
            .map(|(x, (min, range))| x * range + min)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesScaler;

impl SeriesScaler {
    /// Fit a min/max map over every column and return the series mapped into `[0, 1]`.
    ///
    /// Missing (non-finite) cells are ignored by the fit and stay missing in
    /// the normalized copy.
    pub fn fit_transform(series: &Series) -> Result<(Series, ScalerState)> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "cannot fit a scaler on a series with zero rows".to_string(),
            ));
        }

        let width = series.width();
        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        for row in series.rows() {
            for (j, &v) in row.values.iter().enumerate() {
                if v.is_finite() {
                    min[j] = min[j].min(v);
                    max[j] = max[j].max(v);
                }
            }
        }

        // A column with no finite value at all maps through unchanged.
        for lo in min.iter_mut().filter(|lo| !lo.is_finite()) {
            *lo = 0.0;
        }
        let range = min
            .iter()
            .zip(&max)
            .map(|(lo, hi)| {
                let r = hi - lo;
                if r > 0.0 && r.is_finite() {
                    r
                } else {
                    1.0
                }
            })
            .collect();

        let state = ScalerState {
            columns: series.columns().to_vec(),
            min,
            range,
        };
        let normalized = series
            .rows()
            .iter()
            .map(|row| state.transform_row(&row.values))
            .collect();

        Ok((series.with_values(normalized), state))
    }

    /// Map normalized target predictions back to price scale.
    ///
    /// Each value is padded into a full-width row (zeros for every non-target
    /// column) before the inverse map, and only the target column is kept.
    pub fn inverse_transform_target(state: &ScalerState, predicted: &[f64]) -> Result<Vec<f64>> {
        let target = state.target_index();
        predicted
            .iter()
            .map(|&p| {
                let mut padded = vec![0.0; state.width()];
                padded[target] = p;
                let value = state.inverse_row(&padded)[target];
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ForecastError::InvalidInput(format!(
                        "prediction {} does not map back to a finite value",
                        p
                    )))
                }
            })
            .collect()
    }
}
