//! OpenAPI documentation configuration.

use crate::controllers::{HealthResponse, WeatherForecast};
use stash_core::{ErrorResponse, UserId};
use utoipa::OpenApi;

/// OpenAPI documentation for the Stash API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stash API",
        version = "1.0.0",
        description = "Cache-aside user lookups backed by Redis and SQLite",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::user_controller::get_user,
        crate::controllers::weather_controller::get_weather_forecast,
        crate::controllers::health_controller::health_check,
    ),
    components(
        schemas(
            UserId,
            ErrorResponse,
            HealthResponse,
            WeatherForecast,
        )
    ),
    tags(
        (name = "users", description = "User lookup endpoints"),
        (name = "weather", description = "Sample forecast endpoint"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
