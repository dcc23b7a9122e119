pub mod forecast;
pub mod series;

pub use forecast::{ForecastReport, PricePoint};
pub use series::{Series, SeriesRow};
