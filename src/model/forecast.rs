use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Historical closes plus the de-normalized forecast for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub instrument: String,
    pub historical: Vec<PricePoint>,
    pub predictions: Vec<PricePoint>,
}

impl ForecastReport {
    pub fn horizon(&self) -> usize {
        self.predictions.len()
    }
}
