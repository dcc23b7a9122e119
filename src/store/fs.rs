use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::cache::ArtifactCache;
use crate::config::{Config, DataConfig};
use crate::error::{ForecastError, Result};
use crate::forecast::SequencePredictor;
use crate::model::Series;
use crate::predictor::SequenceModel;
use crate::store::series_csv::{read_series, SeriesCsvOptions};
use crate::store::{ModelSource, SeriesSource};

/// Reads per-instrument series CSVs and model JSON documents from a data
/// directory laid out by the `data.*_file` patterns.
#[derive(Debug)]
pub struct FsArtifactStore {
    data: DataConfig,
    csv: SeriesCsvOptions,
    series_cache: Option<ArtifactCache<Series>>,
    model_cache: Option<ArtifactCache<SequenceModel>>,
}

impl FsArtifactStore {
    pub fn new(data: DataConfig, target_column: &str, cache_artifacts: bool) -> Self {
        let csv = SeriesCsvOptions {
            date_column: data.date_column.clone(),
            date_format: data.date_format.clone(),
            drop_columns: data.drop_columns.clone(),
            target_column: target_column.to_string(),
        };
        Self {
            data,
            csv,
            series_cache: cache_artifacts.then(ArtifactCache::new),
            model_cache: cache_artifacts.then(ArtifactCache::new),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.data.clone(),
            &config.forecast.target_column,
            config.forecast.cache_artifacts,
        )
    }

    pub fn cached_artifacts(&self) -> usize {
        self.series_cache.as_ref().map_or(0, ArtifactCache::len)
            + self.model_cache.as_ref().map_or(0, ArtifactCache::len)
    }

    fn read_series_file(&self, path: &Path) -> Result<Series> {
        let file = File::open(path).map_err(|e| {
            ForecastError::DataNotFound(format!("{} could not be loaded: {}", path.display(), e))
        })?;
        read_series(BufReader::new(file), &self.csv)
    }

    fn read_model_file(path: &Path) -> Result<SequenceModel> {
        let corrupt = |reason: String| ForecastError::CorruptArtifact {
            path: path.display().to_string(),
            reason,
        };
        let payload = std::fs::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
        SequenceModel::from_json_str(&payload).map_err(|e| corrupt(format!("{:#}", e)))
    }
}

/// `None` when the path does not name a regular file.
fn file_modified(path: &Path) -> Option<io::Result<SystemTime>> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.modified()),
        _ => None,
    }
}

impl SeriesSource for FsArtifactStore {
    fn load_series(&self, instrument: &str) -> Result<Arc<Series>> {
        let path = self.data.series_path(instrument);
        let not_found =
            || ForecastError::DataNotFound(format!("history for {} not found", instrument));
        let Some(modified) = file_modified(&path) else {
            return Err(not_found());
        };

        match (&self.series_cache, modified) {
            (Some(cache), Ok(modified)) => {
                cache.get_or_load(&path, modified, |p| self.read_series_file(p))
            }
            _ => self.read_series_file(&path).map(Arc::new),
        }
    }
}

impl ModelSource for FsArtifactStore {
    fn load_model(&self, instrument: &str) -> Result<Arc<dyn SequencePredictor>> {
        let path = self.data.model_path(instrument);
        let Some(modified) = file_modified(&path) else {
            return Err(ForecastError::ModelNotFound(instrument.to_string()));
        };

        let model = match (&self.model_cache, modified) {
            (Some(cache), Ok(modified)) => cache.get_or_load(&path, modified, Self::read_model_file)?,
            _ => Arc::new(Self::read_model_file(&path)?),
        };
        tracing::debug!(
            instrument,
            kind = model.kind().as_str(),
            path = %path.display(),
            "Loaded sequence model"
        );
        Ok(model)
    }
}
