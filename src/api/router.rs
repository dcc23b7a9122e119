use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::market::MarketData;
use crate::service::ForecastService;

/// Shared across handlers; everything inside is read-only apart from the
/// artifact caches.
pub struct AppState {
    pub forecasts: Arc<ForecastService>,
    pub market: Arc<MarketData>,
}

impl AppState {
    pub fn new(forecasts: Arc<ForecastService>, market: Arc<MarketData>) -> Self {
        Self { forecasts, market }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict/{instrument}", get(handlers::predict))
        .route("/get_funds", get(handlers::list_funds))
        .route("/get_fund_data", post(handlers::fund_data))
        .route("/api/gold_prices", get(handlers::gold_prices))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
