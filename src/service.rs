use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastEngine, WindowBuilder};
use crate::model::{ForecastReport, PricePoint};
use crate::scaler::SeriesScaler;
use crate::store::{ModelSource, SeriesSource};

/// Instrument identifiers end up in file paths, so only a conservative
/// character set is accepted.
pub fn validate_instrument_id(instrument: &str) -> Result<()> {
    let ok = !instrument.is_empty()
        && instrument.len() <= 64
        && !instrument.starts_with('.')
        && instrument
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(ForecastError::InvalidInput(format!(
            "invalid instrument identifier '{}'",
            instrument
        )))
    }
}

/// The `horizon` calendar days following `last`.
pub fn future_dates(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|d| {
            last.checked_add_days(Days::new(d)).ok_or_else(|| {
                ForecastError::InvalidInput(format!("date overflow after {}", last))
            })
        })
        .collect()
}

/// Loads an instrument's history and model, then runs
/// scale → window → rollout → inverse for every request.
pub struct ForecastService {
    settings: ForecastConfig,
    engine: ForecastEngine,
    series: Arc<dyn SeriesSource>,
    models: Arc<dyn ModelSource>,
}

impl ForecastService {
    pub fn new(
        settings: ForecastConfig,
        series: Arc<dyn SeriesSource>,
        models: Arc<dyn ModelSource>,
    ) -> Self {
        Self {
            engine: ForecastEngine::new(settings.window_length),
            settings,
            series,
            models,
        }
    }

    pub fn default_horizon(&self) -> usize {
        self.settings.horizon
    }

    pub fn forecast(&self, instrument: &str, horizon: usize) -> Result<ForecastReport> {
        validate_instrument_id(instrument)?;
        if horizon == 0 || horizon > self.settings.max_horizon {
            return Err(ForecastError::InvalidInput(format!(
                "horizon must be within 1..={} (got {})",
                self.settings.max_horizon, horizon
            )));
        }

        let model = self.models.load_model(instrument)?;
        let series = self.series.load_series(instrument)?;

        let history = series
            .column(&self.settings.history_column)
            .ok_or_else(|| {
                ForecastError::DataNotFound(format!(
                    "history for {} is missing column '{}'",
                    instrument, self.settings.history_column
                ))
            })?;

        let window_length = self.settings.window_length;
        if series.len() <= window_length {
            return Err(ForecastError::InsufficientData {
                rows: series.len(),
                window_length,
            });
        }

        let (normalized, scaler) = SeriesScaler::fit_transform(&series)?;
        let windows = WindowBuilder::build(&normalized, window_length)?;
        let seed = windows
            .last_window()
            .ok_or(ForecastError::InsufficientData {
                rows: series.len(),
                window_length,
            })?;

        let predicted = self.engine.rollout(model.as_ref(), &seed, horizon)?;
        let values = SeriesScaler::inverse_transform_target(&scaler, &predicted)?;

        let last = series.last_date().ok_or(ForecastError::InsufficientData {
            rows: 0,
            window_length,
        })?;
        let predictions = future_dates(last, horizon)?
            .into_iter()
            .zip(values)
            .map(|(date, value)| PricePoint::new(date, value))
            .collect();

        tracing::info!(
            instrument,
            model = model.name(),
            rows = series.len(),
            features = series.feature_count(),
            horizon,
            "Forecast produced"
        );

        Ok(ForecastReport {
            instrument: instrument.to_string(),
            historical: history
                .into_iter()
                .map(|(date, value)| PricePoint::new(date, value))
                .collect(),
            predictions,
        })
    }
}
