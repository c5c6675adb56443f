use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::seed;
use crate::services::{InMemoryMovieService, MovieService};

mod error;
mod movies;
mod observability;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieService>,

    pub cors_allowed_origins: Vec<String>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(movies: Arc<dyn MovieService>) -> Self {
        Self {
            movies,
            cors_allowed_origins: vec!["*".to_string()],
            prometheus_handle: None,
        }
    }

    #[must_use]
    pub fn movies(&self) -> &Arc<dyn MovieService> {
        &self.movies
    }
}

/// Seeds a fresh in-memory catalogue according to `config`.
pub fn create_app_state_from_config(
    config: &Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let seed = seed::load(config.general.seed_path.as_deref().map(Path::new))?;
    let movies: Arc<dyn MovieService> = Arc::new(InMemoryMovieService::with_seed(seed));

    Ok(Arc::new(AppState {
        movies,
        cors_allowed_origins: config.server.cors_allowed_origins.clone(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let [nosniff, no_store, csp, no_frames] = observability::security_headers();

    Router::new()
        .route(
            "/movies",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route(
            "/movies/{id}",
            get(movies::get_movie).patch(movies::update_movie),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(observability::track_requests))
        .fallback(observability::unknown_route)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(nosniff)
        .layer(no_store)
        .layer(csp)
        .layer(no_frames)
}
