use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::Instrument;

use crate::api::dto::*;
use crate::api::{ApiError, AppState};

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /predict/{instrument}
///
/// Everything, including the error response, is logged inside a span that
/// carries the request's `request_id`.
pub async fn predict(
    Path(instrument): Path<String>,
    query: Result<Query<PredictQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("forecast", %request_id, instrument = %instrument);
    async move {
        match run_forecast(instrument, query, state).await {
            Ok(body) => body.into_response(),
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

async fn run_forecast(
    instrument: String,
    query: Result<Query<PredictQuery>, QueryRejection>,
    state: Arc<AppState>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let horizon = query
        .days
        .unwrap_or_else(|| state.forecasts.default_horizon());
    tracing::info!(horizon, "Forecast requested");

    let service = Arc::clone(&state.forecasts);
    let span = tracing::Span::current();
    let report = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        service.forecast(&instrument, horizon)
    })
    .await
    .map_err(|e| ApiError::internal(format!("forecast task failed: {}", e)))??;

    tracing::info!(predictions = report.horizon(), "Forecast served");
    Ok(Json(PredictResponse::from(&report)))
}

/// GET /get_funds
pub async fn list_funds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FundListResponse>, ApiError> {
    let market = Arc::clone(&state.market);
    let mutual_funds = tokio::task::spawn_blocking(move || market.fund_schemes())
        .await
        .map_err(|e| ApiError::internal(format!("fund task failed: {}", e)))??;
    Ok(Json(FundListResponse { mutual_funds }))
}

/// POST /get_fund_data
pub async fn fund_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FundDataRequest>,
) -> Result<Json<FundDataResponse>, ApiError> {
    let market = Arc::clone(&state.market);
    let scheme = req.fund_name.trim().to_string();
    let data = tokio::task::spawn_blocking(move || market.fund_data(&scheme))
        .await
        .map_err(|e| ApiError::internal(format!("fund task failed: {}", e)))??;

    data.map(|d| Json(FundDataResponse::from(d)))
        .ok_or_else(|| ApiError::not_found("Fund not found!"))
}

/// GET /api/gold_prices
pub async fn gold_prices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GoldPricesResponse>, ApiError> {
    let market = Arc::clone(&state.market);
    let prices = tokio::task::spawn_blocking(move || market.gold_prices())
        .await
        .map_err(|e| ApiError::internal(format!("gold task failed: {}", e)))?;
    Ok(Json(GoldPricesResponse {
        historical_data: prices.historical,
        future_predictions: prices.predicted,
    }))
}
