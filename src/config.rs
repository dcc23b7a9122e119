use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const INSTRUMENT_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5003".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub window_length: usize,
    pub horizon: usize,
    pub max_horizon: usize,
    pub target_column: String,
    pub history_column: String,
    pub cache_artifacts: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_length: 60,
            horizon: 30,
            max_horizon: 365,
            target_column: "CloseNext".to_string(),
            history_column: "Close".to_string(),
            cache_artifacts: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub base_dir: PathBuf,
    pub series_file: String,
    pub model_file: String,
    pub date_column: String,
    pub date_format: String,
    pub drop_columns: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("new"),
            series_file: "{id}/{id}.NS_l.csv".to_string(),
            model_file: "{id}/{id}_lstm_model.json".to_string(),
            date_column: "Date".to_string(),
            date_format: "%d-%m-%Y".to_string(),
            drop_columns: vec!["SO".to_string(), "EMA".to_string()],
        }
    }
}

impl DataConfig {
    pub fn series_path(&self, instrument: &str) -> PathBuf {
        self.base_dir
            .join(self.series_file.replace(INSTRUMENT_PLACEHOLDER, instrument))
    }

    pub fn model_path(&self, instrument: &str) -> PathBuf {
        self.base_dir
            .join(self.model_file.replace(INSTRUMENT_PLACEHOLDER, instrument))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub base_dir: PathBuf,
    pub funds_file: String,
    pub fund_predictions_file: String,
    pub gold_actual_file: String,
    pub gold_predicted_file: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data"),
            funds_file: "Finally_merged3.csv".to_string(),
            fund_predictions_file: "mutual_funds_predictions.csv".to_string(),
            gold_actual_file: "actual_prices.csv".to_string(),
            gold_predicted_file: "predicted_prices.csv".to_string(),
        }
    }
}

impl MarketConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.base_dir.join(file)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Reads `config/default.toml` (or `FINSIGHT_CONFIG`) and applies env overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("FINSIGHT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_path(&config_path)?;

        if let Ok(bind) = std::env::var("FINSIGHT_BIND") {
            config.server.bind = bind;
        }
        if let Ok(dir) = std::env::var("FINSIGHT_DATA_DIR") {
            config.data.base_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.forecast;
        if f.window_length == 0 {
            bail!("forecast.window_length must be > 0");
        }
        if f.max_horizon == 0 {
            bail!("forecast.max_horizon must be > 0");
        }
        if f.horizon == 0 || f.horizon > f.max_horizon {
            bail!(
                "forecast.horizon must be within 1..={} (got {})",
                f.max_horizon,
                f.horizon
            );
        }
        if f.target_column.trim().is_empty() || f.history_column.trim().is_empty() {
            bail!("forecast.target_column and forecast.history_column must be set");
        }
        for (key, pattern) in [
            ("data.series_file", &self.data.series_file),
            ("data.model_file", &self.data.model_file),
        ] {
            if !pattern.contains(INSTRUMENT_PLACEHOLDER) {
                bail!(
                    "{} '{}' must contain the {} placeholder",
                    key,
                    pattern,
                    INSTRUMENT_PLACEHOLDER
                );
            }
        }
        if self.data.date_column.trim().is_empty() {
            bail!("data.date_column must be set");
        }
        Ok(())
    }
}
