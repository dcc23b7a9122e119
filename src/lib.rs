pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod logging;
pub mod market;
pub mod model;
pub mod predictor;
pub mod scaler;
pub mod service;
pub mod store;

pub use error::ForecastError;
