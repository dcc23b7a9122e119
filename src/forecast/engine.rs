use std::collections::VecDeque;

use crate::error::{ForecastError, Result};
use crate::forecast::window::Window;

/// A trained model mapping a normalized `window_length × feature_count`
/// window to one normalized target value.
pub trait SequencePredictor: Send + Sync {
    fn predict(&self, window: &[Vec<f64>]) -> anyhow::Result<f64>;

    fn name(&self) -> &str {
        "sequence-model"
    }
}

/// The mutable input buffer of a single rollout.
///
/// Holds exactly `window_length` rows; each step drops the oldest row and
/// appends the previous newest row with its last feature replaced by the
/// prediction.
#[derive(Debug, Clone)]
pub struct RollingState {
    rows: VecDeque<Vec<f64>>,
}

impl RollingState {
    pub fn from_window(window: &Window<'_>) -> Self {
        Self {
            rows: window.feature_rows().map(|r| r.to_vec()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&mut self) -> &[Vec<f64>] {
        self.rows.make_contiguous()
    }

    pub fn advance(&mut self, prediction: f64) {
        let Some(prev) = self.rows.back() else {
            return;
        };
        let mut next = Vec::with_capacity(prev.len());
        next.extend_from_slice(&prev[..prev.len().saturating_sub(1)]);
        next.push(prediction);
        self.rows.pop_front();
        self.rows.push_back(next);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForecastEngine {
    window_length: usize,
}

impl ForecastEngine {
    pub fn new(window_length: usize) -> Self {
        Self { window_length }
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Roll the predictor forward `horizon` steps from `seed`, feeding every
    /// prediction back into the input window. Returns normalized values.
    ///
    /// Any predictor error aborts the whole rollout.
    pub fn rollout<P>(&self, predictor: &P, seed: &Window<'_>, horizon: usize) -> Result<Vec<f64>>
    where
        P: SequencePredictor + ?Sized,
    {
        if seed.len() != self.window_length {
            return Err(ForecastError::InvalidInput(format!(
                "seed window has {} rows, expected {}",
                seed.len(),
                self.window_length
            )));
        }
        let mut state = RollingState::from_window(seed);
        if state.rows.iter().any(|r| r.is_empty()) {
            return Err(ForecastError::InvalidInput(
                "seed window has no feature columns".to_string(),
            ));
        }
        if let Some(step) = state
            .rows
            .iter()
            .position(|r| r.iter().any(|v| !v.is_finite()))
        {
            return Err(ForecastError::InvalidInput(format!(
                "seed window has a missing value in row {} of {}",
                step + 1,
                self.window_length
            )));
        }

        let mut predictions = Vec::with_capacity(horizon);
        for step in 0..horizon {
            let value = predictor.predict(state.rows()).map_err(|e| {
                ForecastError::PredictionFailure(format!(
                    "{} failed at step {}: {:#}",
                    predictor.name(),
                    step + 1,
                    e
                ))
            })?;
            if !value.is_finite() {
                return Err(ForecastError::PredictionFailure(format!(
                    "{} produced a non-finite value at step {}",
                    predictor.name(),
                    step + 1
                )));
            }
            predictions.push(value);
            state.advance(value);
            debug_assert_eq!(state.len(), self.window_length);
        }

        tracing::debug!(
            model = predictor.name(),
            horizon,
            window_length = self.window_length,
            "Rollout complete"
        );
        Ok(predictions)
    }
}
