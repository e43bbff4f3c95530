//! Main application router.

use crate::{
    controllers::{health_controller, metrics_controller, user_controller, weather_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use stash_config::ServerConfig;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Where and from which recorder the Prometheus text is served.
#[derive(Clone)]
pub struct MetricsEndpoint {
    pub path: String,
    pub handle: PrometheusHandle,
}

/// Creates the application router.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    metrics: Option<MetricsEndpoint>,
) -> Router {
    let mut router = Router::new()
        .merge(health_controller::router())
        .merge(weather_controller::router())
        .merge(user_controller::router().with_state(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(MetricsEndpoint { path, handle }) = metrics {
        info!("Serving Prometheus metrics at {}", path);
        router = router.merge(metrics_controller::router(&path, handle));
    }

    let router = router
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}
