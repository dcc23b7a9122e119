use serde::{Deserialize, Serialize};

use crate::market::{FundData, GoldPricePoint, NavPoint, PredictedNavPoint};
use crate::model::{ForecastReport, PricePoint};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictQuery {
    pub days: Option<usize>,
}

/// Parallel date / price arrays, the shape the chart front-end consumes.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceSeriesDto {
    pub indices: Vec<String>,
    pub prices: Vec<f64>,
}

impl From<&[PricePoint]> for PriceSeriesDto {
    fn from(points: &[PricePoint]) -> Self {
        Self {
            indices: points
                .iter()
                .map(|p| p.date.format(DATE_FORMAT).to_string())
                .collect(),
            prices: points.iter().map(|p| p.value).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub historical: PriceSeriesDto,
    pub predictions: PriceSeriesDto,
}

impl From<&ForecastReport> for PredictResponse {
    fn from(report: &ForecastReport) -> Self {
        Self {
            historical: PriceSeriesDto::from(report.historical.as_slice()),
            predictions: PriceSeriesDto::from(report.predictions.as_slice()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FundListResponse {
    pub mutual_funds: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FundDataRequest {
    #[serde(default)]
    pub fund_name: String,
}

#[derive(Debug, Serialize)]
pub struct FundDataResponse {
    pub historical_data: Vec<NavPoint>,
    pub future_predictions: Vec<PredictedNavPoint>,
}

impl From<FundData> for FundDataResponse {
    fn from(data: FundData) -> Self {
        Self {
            historical_data: data.historical,
            future_predictions: data.predictions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GoldPricesResponse {
    pub historical_data: Vec<GoldPricePoint>,
    pub future_predictions: Vec<GoldPricePoint>,
}
