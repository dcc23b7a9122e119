use std::collections::HashSet;
use std::io::Read;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavPoint {
    pub date: String,
    pub nav: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedNavPoint {
    pub date: String,
    pub predicted_nav: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NavRecord {
    #[serde(rename = "Scheme Code")]
    scheme: String,
    date: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    nav: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PredictedNavRecord {
    #[serde(rename = "Scheme Code")]
    scheme: String,
    date: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    predicted_nav: Option<f64>,
}

/// Historical NAV rows for every mutual fund scheme. A NAV that is empty or
/// not numeric is kept as `None`.
#[derive(Debug, Clone, Default)]
pub struct FundTable {
    rows: Vec<(String, NavPoint)>,
}

impl FundTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();
        for (i, rec) in rdr.deserialize::<NavRecord>().enumerate() {
            let rec = rec.with_context(|| format!("invalid fund row {}", i + 1))?;
            rows.push((
                rec.scheme,
                NavPoint {
                    date: rec.date,
                    nav: rec.nav,
                },
            ));
        }
        Ok(Self { rows })
    }

    /// Unique scheme codes in first-seen order.
    pub fn schemes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (scheme, _) in &self.rows {
            if seen.insert(scheme.as_str()) {
                out.push(scheme.clone());
            }
        }
        out
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.rows.iter().any(|(s, _)| s == scheme)
    }

    pub fn history(&self, scheme: &str) -> Vec<NavPoint> {
        self.rows
            .iter()
            .filter(|(s, _)| s == scheme)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

/// Precomputed NAV predictions per scheme.
#[derive(Debug, Clone, Default)]
pub struct FundPredictionTable {
    rows: Vec<(String, PredictedNavPoint)>,
}

impl FundPredictionTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();
        for (i, rec) in rdr.deserialize::<PredictedNavRecord>().enumerate() {
            let rec = rec.with_context(|| format!("invalid prediction row {}", i + 1))?;
            rows.push((
                rec.scheme,
                PredictedNavPoint {
                    date: rec.date,
                    predicted_nav: rec.predicted_nav,
                },
            ));
        }
        Ok(Self { rows })
    }

    pub fn for_scheme(&self, scheme: &str) -> Vec<PredictedNavPoint> {
        self.rows
            .iter()
            .filter(|(s, _)| s == scheme)
            .map(|(_, p)| p.clone())
            .collect()
    }
}
