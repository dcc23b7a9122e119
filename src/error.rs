use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("model for {0} not found")]
    ModelNotFound(String),

    #[error("data not found: {0}")]
    DataNotFound(String),

    #[error("not enough data to build a window: {rows} rows, window length {window_length}")]
    InsufficientData { rows: usize, window_length: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("prediction failed: {0}")]
    PredictionFailure(String),

    #[error("corrupt artifact {path}: {reason}")]
    CorruptArtifact { path: String, reason: String },
}

pub type Result<T, E = ForecastError> = std::result::Result<T, E>;
