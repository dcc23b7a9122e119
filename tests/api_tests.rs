mod support;

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use finsight::api::{create_router, AppState};
use finsight::config::MarketConfig;
use finsight::market::MarketData;
use serde_json::Value;
use support::{constant_model_json, service, stock_csv, temp_dir, write_instrument};
use tower::ServiceExt;

fn app(base: &Path) -> Router {
    let market = MarketData::new(MarketConfig {
        base_dir: base.join("market"),
        ..MarketConfig::default()
    });
    let state = AppState::new(Arc::new(service(base, 60)), Arc::new(market));
    create_router(Arc::new(state))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[test]
fn health_reports_ok() {
    let base = temp_dir("api-health");
    let (status, body) = tokio_test::block_on(get(app(&base), "/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn predict_returns_historical_and_prediction_arrays() {
    let base = temp_dir("api-predict");
    write_instrument(
        &base,
        "TCS",
        Some(&stock_csv(65)),
        Some(&constant_model_json(60, 0.25)),
    );

    let (status, body) = get(app(&base), "/predict/TCS?days=5").await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let hist = &body["historical"];
    assert_eq!(hist["indices"].as_array().unwrap().len(), 65);
    assert_eq!(hist["prices"].as_array().unwrap().len(), 65);
    assert_eq!(hist["indices"][0], "2024-01-01");

    let preds = &body["predictions"];
    let dates: Vec<&str> = preds["indices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-03-06", "2024-03-07", "2024-03-08", "2024-03-09", "2024-03-10"]
    );
    let first = preds["prices"][0].as_f64().unwrap();
    assert!((first - 117.0).abs() < 1e-9, "{first}");

    let (status, body) = get(app(&base), "/predict/TCS").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predictions"]["prices"].as_array().unwrap().len(), 30);

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn predict_maps_errors_to_status_codes() {
    let base = temp_dir("api-errors");
    write_instrument(
        &base,
        "SHORT",
        Some(&stock_csv(60)),
        Some(&constant_model_json(60, 0.5)),
    );
    write_instrument(&base, "BROKEN", Some(&stock_csv(70)), Some("{"));

    let (status, body) = get(app(&base), "/predict/SHORT?days=5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("60"));

    let (status, body) = get(app(&base), "/predict/NOSUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("NOSUCH"));

    let (status, _) = get(app(&base), "/predict/SHORT?days=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for uri in ["/predict/SHORT?days=abc", "/predict/SHORT?days=-3"] {
        let (status, body) = get(app(&base), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("days"), "{body}");
    }

    let (status, _) = get(app(&base), "/predict/..SHORT").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(app(&base), "/predict/BROKEN").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn fund_and_gold_endpoints_serve_market_tables() {
    let base = temp_dir("api-market");
    let market = base.join("market");
    std::fs::create_dir_all(&market).unwrap();
    std::fs::write(
        market.join("Finally_merged3.csv"),
        "Scheme Code,date,nav\nAXIS,01-01-2024,10.0\nAXIS,02-01-2024,10.2\nHDFC,01-01-2024,N.A.\n",
    )
    .unwrap();
    std::fs::write(
        market.join("actual_prices.csv"),
        "Date,price\n01-01-2024,6300\n02-01-2024,oops\n",
    )
    .unwrap();

    let (status, body) = get(app(&base), "/get_funds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mutual_funds"], serde_json::json!(["AXIS", "HDFC"]));

    let post = |name: &str| {
        Request::post("/get_fund_data")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "fund_name": name }).to_string()))
            .unwrap()
    };
    let (status, body) = send(app(&base), post(" AXIS ")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["historical_data"].as_array().unwrap().len(), 2);
    assert_eq!(body["historical_data"][1]["nav"], 10.2);
    assert_eq!(body["future_predictions"], serde_json::json!([]));

    let (status, body) = send(app(&base), post("HDFC")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["historical_data"][0]["nav"].is_null());

    let (status, body) = send(app(&base), post("NOPE")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Fund not found!");

    let (status, body) = get(app(&base), "/api/gold_prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["historical_data"][0]["Date"], "2024-01-01");
    assert_eq!(body["historical_data"][1]["price"], 0.0);
    assert_eq!(body["future_predictions"], serde_json::json!([]));

    let _ = std::fs::remove_dir_all(&base);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn rejected_forecast_is_logged_with_its_request_id() {
    let base = temp_dir("api-logs");
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, _) = get(app(&base), "/predict/NOSUCH?days=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let rejected = text
        .lines()
        .find(|l| l.contains("Request rejected"))
        .unwrap_or_else(|| panic!("no rejection logged:\n{text}"));
    assert!(rejected.contains("request_id="), "{rejected}");
    assert!(rejected.contains("instrument=NOSUCH"), "{rejected}");

    let _ = std::fs::remove_dir_all(&base);
}
