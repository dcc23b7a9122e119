use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// One weight per (time step, feature) plus a bias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSequenceModel {
    pub weights: Vec<Vec<f64>>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearSequenceModel {
    pub fn new(weights: Vec<Vec<f64>>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn window_length(&self) -> usize {
        self.weights.len()
    }

    pub fn input_size(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() || self.input_size() == 0 {
            bail!("linear model has no weights");
        }
        let width = self.input_size();
        if let Some(i) = self.weights.iter().position(|r| r.len() != width) {
            bail!(
                "linear weights row {} has {} columns, expected {}",
                i,
                self.weights[i].len(),
                width
            );
        }
        if !self.bias.is_finite() || self.weights.iter().flatten().any(|w| !w.is_finite()) {
            bail!("linear model contains non-finite weights");
        }
        Ok(())
    }

    pub fn predict(&self, window: &[Vec<f64>]) -> Result<f64> {
        if window.len() != self.window_length() {
            bail!(
                "linear model expects {} time steps, got {}",
                self.window_length(),
                window.len()
            );
        }
        let mut acc = self.bias;
        for (t, (row, w)) in window.iter().zip(&self.weights).enumerate() {
            if row.len() != w.len() {
                bail!(
                    "linear model expects {} features, got {} at step {}",
                    w.len(),
                    row.len(),
                    t
                );
            }
            acc += row.iter().zip(w).map(|(x, w)| x * w).sum::<f64>();
        }
        Ok(acc)
    }
}
