//! Sample weather forecast endpoint.

use axum::{response::IntoResponse, routing::get, Json, Router};
use chrono::{Days, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

/// Words a forecast summary is drawn from.
pub const SUMMARIES: [&str; 10] = [
    "Freezing", "Bracing", "Chilly", "Cool", "Mild", "Warm", "Balmy", "Hot", "Sweltering",
    "Scorching",
];

/// Number of days covered by one forecast.
pub const FORECAST_DAYS: u64 = 5;

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Builds a forecast, deriving the Fahrenheit reading.
    #[must_use]
    pub fn new(date: NaiveDate, temperature_c: i32, summary: Option<String>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: fahrenheit(temperature_c),
            summary,
        }
    }
}

/// `32 + C / 0.5556`, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn fahrenheit(celsius: i32) -> i32 {
    32 + (f64::from(celsius) / 0.5556) as i32
}

/// Random forecasts for the days following `today`.
fn forecast(today: NaiveDate) -> Vec<WeatherForecast> {
    let mut rng = rand::thread_rng();
    (1..=FORECAST_DAYS)
        .map(|offset| {
            WeatherForecast::new(
                today + Days::new(offset),
                rng.gen_range(-20..55),
                SUMMARIES.choose(&mut rng).map(|s| (*s).to_string()),
            )
        })
        .collect()
}

/// Creates the weather router.
pub fn router() -> Router {
    Router::new().route("/weatherforecast", get(get_weather_forecast))
}

/// Five-day random forecast.
#[utoipa::path(
    get,
    path = "/weatherforecast",
    tag = "weather",
    responses(
        (status = 200, description = "Forecast for the next five days", body = [WeatherForecast])
    )
)]
pub async fn get_weather_forecast() -> impl IntoResponse {
    Json(forecast(Local::now().date_naive()))
}
