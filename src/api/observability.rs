//! Request telemetry, the Prometheus scrape endpoint and the JSON 404 for
//! unknown routes.

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, Method, Uri, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{Instrument, debug, info_span, warn};

use super::{ApiError, AppState};
use crate::constants::metrics::{HTTP_REQUEST_DURATION, HTTP_REQUESTS, UNKNOWN_ROUTE};

/// Renders the scrape text, or 404 when no recorder was installed.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    state
        .prometheus_handle
        .as_ref()
        .map(metrics_exporter_prometheus::PrometheusHandle::render)
        .ok_or_else(|| ApiError::NotFound("Metrics are disabled".to_string()))
}

/// Fallback for paths outside the movie API.
pub async fn unknown_route(method: Method, uri: Uri) -> ApiError {
    debug!(%method, path = %uri.path(), "No route matched");
    record_request(&method, UNKNOWN_ROUTE, 404, 0.0);
    ApiError::NotFound("Route not found".to_string())
}

/// Span and metrics for every routed request, labelled by route template so
/// movie ids never become label values.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNKNOWN_ROUTE.to_string(), |p| p.as_str().to_string());

    let span = info_span!(
        "movies_request",
        method = %method,
        route = %route,
        status = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let elapsed = start.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        tracing::Span::current().record("status", status.as_u16());
        record_request(&method, &route, status.as_u16(), elapsed.as_secs_f64());

        if status.is_server_error() {
            warn!(elapsed_ms, "Request failed");
        } else {
            debug!(elapsed_ms, "Request handled");
        }

        response
    }
    .instrument(span)
    .await
}

fn record_request(method: &Method, route: &str, status: u16, seconds: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!(HTTP_REQUESTS, &labels).increment(1);
    metrics::histogram!(HTTP_REQUEST_DURATION, &labels).record(seconds);
}

/// Response headers for a JSON-only API: nothing is cacheable, sniffable
/// or frameable.
pub fn security_headers() -> [SetResponseHeaderLayer<HeaderValue>; 4] {
    [
        SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ),
    ]
}
