pub mod linear;
pub mod lstm;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::forecast::SequencePredictor;

pub use linear::LinearSequenceModel;
pub use lstm::{LstmSequenceModel, LstmWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceModelKind {
    Linear,
    Lstm,
}

impl SequenceModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Lstm => "lstm",
        }
    }
}

/// A trained sequence model as persisted on disk, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceModel {
    Linear(LinearSequenceModel),
    Lstm(LstmSequenceModel),
}

impl SequenceModel {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let model: SequenceModel = serde_json::from_str(s)?;
        model.validate()?;
        Ok(model)
    }

    pub fn kind(&self) -> SequenceModelKind {
        match self {
            Self::Linear(_) => SequenceModelKind::Linear,
            Self::Lstm(_) => SequenceModelKind::Lstm,
        }
    }

    /// Check that every weight matrix has the shape its header declares.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::Lstm(m) => m.validate(),
        }
    }
}

impl SequencePredictor for SequenceModel {
    fn predict(&self, window: &[Vec<f64>]) -> Result<f64> {
        match self {
            Self::Linear(m) => m.predict(window),
            Self::Lstm(m) => m.predict(window),
        }
    }

    fn name(&self) -> &str {
        self.kind().as_str()
    }
}
