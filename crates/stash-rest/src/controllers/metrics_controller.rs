//! Prometheus scrape endpoint.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;

/// Serves the rendered metrics of `handle` at `path`.
pub fn router(path: &str, handle: PrometheusHandle) -> Router {
    Router::new().route(path, get(move || std::future::ready(handle.render())))
}
