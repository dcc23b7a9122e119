#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use finsight::config::{DataConfig, ForecastConfig};
use finsight::model::{Series, SeriesRow};
use finsight::service::ForecastService;
use finsight::store::FsArtifactStore;

pub const FEATURES: usize = 5;

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("finsight-{}-{}", name, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// `Date,Open,High,Low,Close,Volume,SO,EMA,CloseNext` with Close = 100 + i.
pub fn stock_csv(rows: usize) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume,SO,EMA,CloseNext\n");
    for i in 0..rows {
        let date = start_date() + Days::new(i as u64);
        let close = 100.0 + i as f64;
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            date.format("%d-%m-%Y"),
            close - 0.5,
            close + 1.0,
            close - 1.0,
            close,
            1000.0 + 10.0 * i as f64,
            "x",
            "y",
            close + 1.0
        ));
    }
    out
}

/// Replace one cell of a CSV produced by [`stock_csv`]; `row` is 0-based
/// over data rows.
pub fn with_cell(csv: &str, row: usize, column: &str, value: &str) -> String {
    let mut lines: Vec<String> = csv.lines().map(str::to_string).collect();
    let col = lines[0]
        .split(',')
        .position(|h| h == column)
        .expect("column present");
    let mut cells: Vec<String> = lines[row + 1].split(',').map(str::to_string).collect();
    cells[col] = value.to_string();
    lines[row + 1] = cells.join(",");
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Linear model with zero weights, so every step predicts `bias`.
pub fn constant_model_json(window_length: usize, bias: f64) -> String {
    let weights = vec![vec![0.0; FEATURES]; window_length];
    serde_json::json!({ "kind": "linear", "weights": weights, "bias": bias }).to_string()
}

pub fn write_instrument(base: &Path, id: &str, csv: Option<&str>, model: Option<&str>) {
    let dir = base.join(id);
    std::fs::create_dir_all(&dir).expect("create instrument dir");
    if let Some(csv) = csv {
        std::fs::write(dir.join(format!("{}.NS_l.csv", id)), csv).expect("write csv");
    }
    if let Some(model) = model {
        std::fs::write(dir.join(format!("{}_lstm_model.json", id)), model).expect("write model");
    }
}

pub fn data_config(base: &Path) -> DataConfig {
    DataConfig {
        base_dir: base.to_path_buf(),
        ..DataConfig::default()
    }
}

pub fn service(base: &Path, window_length: usize) -> ForecastService {
    let settings = ForecastConfig {
        window_length,
        ..ForecastConfig::default()
    };
    let store = Arc::new(FsArtifactStore::new(
        data_config(base),
        &settings.target_column,
        true,
    ));
    ForecastService::new(settings, store.clone(), store)
}

/// Three-column series (`Open`, `Close`, `CloseNext`) built from closes.
pub fn small_series(closes: &[f64]) -> Series {
    let rows = closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            SeriesRow::new(
                start_date() + Days::new(i as u64),
                vec![c - 1.0, *c, c + 1.0],
            )
        })
        .collect();
    Series::new(
        vec!["Open".into(), "Close".into(), "CloseNext".into()],
        rows,
        "CloseNext",
    )
    .unwrap()
}
