pub mod engine;
pub mod window;

pub use engine::{ForecastEngine, RollingState, SequencePredictor};
pub use window::{Window, WindowBuilder, WindowSet};
