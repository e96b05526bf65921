//! Tsunami advisory map service.
//!
//! Serves the styled region overlay as GeoJSON and lets clients switch
//! between the live feed and the built-in fixture.

pub mod config;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use config::MapConfig;
pub use state::AppState;

/// Build the HTTP router. `/metrics` is only mounted when a recorder handle is given.
pub fn router(state: Arc<AppState>, prometheus: Option<PrometheusHandle>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/overlay", get(handlers::overlay_handler))
        .route("/api/snapshot", get(handlers::snapshot_handler))
        .route(
            "/api/mode",
            get(handlers::get_mode_handler).post(handlers::set_mode_handler),
        )
        .route("/api/refresh", post(handlers::refresh_handler));

    if let Some(handle) = prometheus {
        app = app
            .route("/metrics", get(handlers::metrics_handler))
            .layer(Extension(handle));
    }

    app.layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
