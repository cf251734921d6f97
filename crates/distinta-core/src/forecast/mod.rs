pub mod engine;
pub mod outcome;

pub use engine::{calculate_forecast, ComponentLookup};
pub use outcome::{ForecastLine, ProductContribution, DESCRIPTION_UNAVAILABLE};
