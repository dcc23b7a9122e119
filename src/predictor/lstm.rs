use anyhow::{bail, Error, Result};
use serde::{Deserialize, Serialize};

/// Raw LSTM parameters as stored in a model document.
///
/// `w_ih` is `4H × input_size`, `w_hh` is `4H × H` and `b` has `4H` entries,
/// stacked in input / forget / cell / output gate order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmWeights {
    pub input_size: usize,
    pub hidden_size: usize,
    pub w_ih: Vec<Vec<f64>>,
    pub w_hh: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    pub head_w: Vec<f64>,
    #[serde(default)]
    pub head_b: f64,
}

impl LstmWeights {
    pub fn validate(&self) -> Result<()> {
        let h = self.hidden_size;
        if h == 0 || self.input_size == 0 {
            bail!("lstm input_size and hidden_size must be > 0");
        }
        check_matrix("w_ih", &self.w_ih, 4 * h, self.input_size)?;
        check_matrix("w_hh", &self.w_hh, 4 * h, h)?;
        if self.b.len() != 4 * h {
            bail!("lstm b has {} entries, expected {}", self.b.len(), 4 * h);
        }
        if self.head_w.len() != h {
            bail!("lstm head_w has {} entries, expected {}", self.head_w.len(), h);
        }
        let all_finite = self
            .w_ih
            .iter()
            .chain(&self.w_hh)
            .flatten()
            .chain(&self.b)
            .chain(&self.head_w)
            .all(|v| v.is_finite());
        if !all_finite || !self.head_b.is_finite() {
            bail!("lstm model contains non-finite weights");
        }
        Ok(())
    }
}

/// Single-layer LSTM followed by a dense scalar head. Only constructible
/// from weights whose shapes have been checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LstmWeights", into = "LstmWeights")]
pub struct LstmSequenceModel {
    weights: LstmWeights,
}

impl TryFrom<LstmWeights> for LstmSequenceModel {
    type Error = Error;

    fn try_from(weights: LstmWeights) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<LstmSequenceModel> for LstmWeights {
    fn from(model: LstmSequenceModel) -> Self {
        model.weights
    }
}

impl LstmSequenceModel {
    pub fn new(weights: LstmWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &LstmWeights {
        &self.weights
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }

    pub fn predict(&self, window: &[Vec<f64>]) -> Result<f64> {
        if window.is_empty() {
            bail!("lstm received an empty window");
        }
        let w = &self.weights;
        let hs = w.hidden_size;
        let mut h = vec![0.0; hs];
        let mut c = vec![0.0; hs];
        let mut gates = vec![0.0; 4 * hs];

        for (t, x) in window.iter().enumerate() {
            if x.len() != w.input_size {
                bail!(
                    "lstm expects {} features, got {} at step {}",
                    w.input_size,
                    x.len(),
                    t
                );
            }
            for (k, gate) in gates.iter_mut().enumerate() {
                *gate = w.b[k] + dot(&w.w_ih[k], x) + dot(&w.w_hh[k], &h);
            }
            for j in 0..hs {
                let i = sigmoid(gates[j]);
                let f = sigmoid(gates[hs + j]);
                let g = gates[2 * hs + j].tanh();
                let o = sigmoid(gates[3 * hs + j]);
                c[j] = f * c[j] + i * g;
                h[j] = o * c[j].tanh();
            }
        }

        Ok(dot(&w.head_w, &h) + w.head_b)
    }
}

fn check_matrix(name: &str, m: &[Vec<f64>], rows: usize, cols: usize) -> Result<()> {
    if m.len() != rows {
        bail!("lstm {} has {} rows, expected {}", name, m.len(), rows);
    }
    if let Some(i) = m.iter().position(|r| r.len() != cols) {
        bail!(
            "lstm {} row {} has {} columns, expected {}",
            name,
            i,
            m[i].len(),
            cols
        );
    }
    Ok(())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
