//! Pass-through services over precomputed market data: mutual-fund NAV
//! history with stored predictions, and actual/predicted gold prices.

pub mod funds;
pub mod gold;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cache::ArtifactCache;
use crate::config::MarketConfig;

pub use funds::{FundPredictionTable, FundTable, NavPoint, PredictedNavPoint};
pub use gold::{read_gold_prices, GoldPricePoint};

#[derive(Debug, Clone, PartialEq)]
pub struct FundData {
    pub historical: Vec<NavPoint>,
    pub predictions: Vec<PredictedNavPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoldPrices {
    pub historical: Vec<GoldPricePoint>,
    pub predicted: Vec<GoldPricePoint>,
}

#[derive(Debug, Default)]
pub struct MarketData {
    cfg: MarketConfig,
    funds: ArtifactCache<FundTable>,
    fund_predictions: ArtifactCache<FundPredictionTable>,
    gold: ArtifactCache<Vec<GoldPricePoint>>,
}

fn load_cached<T, F>(cache: &ArtifactCache<T>, path: &Path, parse: F) -> Result<Arc<T>>
where
    F: FnOnce(BufReader<File>) -> Result<T>,
{
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("failed to stat {}", path.display()))?;
    cache.get_or_load(path, modified, |p| {
        let file = File::open(p).with_context(|| format!("failed to open {}", p.display()))?;
        parse(BufReader::new(file)).with_context(|| format!("failed to parse {}", p.display()))
    })
}

impl MarketData {
    pub fn new(cfg: MarketConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    fn fund_table(&self) -> Result<Arc<FundTable>> {
        let path = self.cfg.path(&self.cfg.funds_file);
        load_cached(&self.funds, &path, FundTable::from_reader)
    }

    /// Missing or unreadable predictions degrade to an empty table.
    fn fund_prediction_table(&self) -> Arc<FundPredictionTable> {
        let path = self.cfg.path(&self.cfg.fund_predictions_file);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "No fund predictions file found");
            return Arc::new(FundPredictionTable::default());
        }
        load_cached(&self.fund_predictions, &path, FundPredictionTable::from_reader)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %format!("{:#}", e), "Failed to load fund predictions");
                Arc::new(FundPredictionTable::default())
            })
    }

    pub fn fund_schemes(&self) -> Result<Vec<String>> {
        Ok(self.fund_table()?.schemes())
    }

    /// `Ok(None)` when the scheme is unknown.
    pub fn fund_data(&self, scheme: &str) -> Result<Option<FundData>> {
        let table = self.fund_table()?;
        if !table.contains(scheme) {
            return Ok(None);
        }
        Ok(Some(FundData {
            historical: table.history(scheme),
            predictions: self.fund_prediction_table().for_scheme(scheme),
        }))
    }

    fn gold_series(&self, file: &str) -> Vec<GoldPricePoint> {
        let path = self.cfg.path(file);
        match load_cached(&self.gold, &path, read_gold_prices) {
            Ok(points) => points.as_ref().clone(),
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Failed to load gold prices");
                Vec::new()
            }
        }
    }

    pub fn gold_prices(&self) -> GoldPrices {
        GoldPrices {
            historical: self.gold_series(&self.cfg.gold_actual_file),
            predicted: self.gold_series(&self.cfg.gold_predicted_file),
        }
    }
}
