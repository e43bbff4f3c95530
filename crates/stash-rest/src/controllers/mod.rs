//! REST API controllers.

pub mod health_controller;
pub mod metrics_controller;
pub mod user_controller;
pub mod weather_controller;

pub use health_controller::*;
pub use weather_controller::WeatherForecast;
