pub mod fs;
pub mod series_csv;

use std::sync::Arc;

use crate::error::Result;
use crate::forecast::SequencePredictor;
use crate::model::Series;

pub use fs::FsArtifactStore;
pub use series_csv::{read_series, SeriesCsvOptions};

/// Supplies the historical table of an instrument, target column last.
pub trait SeriesSource: Send + Sync {
    fn load_series(&self, instrument: &str) -> Result<Arc<Series>>;
}

/// Supplies the trained predictor of an instrument.
pub trait ModelSource: Send + Sync {
    fn load_model(&self, instrument: &str) -> Result<Arc<dyn SequencePredictor>>;
}
