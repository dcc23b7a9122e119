use std::io::Read;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub const GOLD_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldPricePoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    pub price: f64,
}

/// Parse a `Date,price` table. Prices that are not numeric count as `0.0`;
/// a date that does not parse is an error.
pub fn read_gold_prices<R: Read>(reader: R) -> Result<Vec<GoldPricePoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().context("failed to read gold price header")?.clone();
    let (Some(date_idx), Some(price_idx)) = (
        headers.iter().position(|h| h == "Date"),
        headers.iter().position(|h| h == "price"),
    ) else {
        bail!("gold price table must contain 'Date' and 'price' columns");
    };

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("invalid gold price row {}", i + 1))?;
        let raw_date = rec.get(date_idx).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, GOLD_DATE_FORMAT)
            .with_context(|| format!("invalid date '{}' on gold price row {}", raw_date, i + 1))?;
        let price = rec
            .get(price_idx)
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|p| p.is_finite())
            .unwrap_or(0.0);
        out.push(GoldPricePoint { date, price });
    }
    Ok(out)
}
