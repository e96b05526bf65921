//! HTTP request handlers.

use std::sync::Arc;

use advisory_common::AdvisoryError;
use advisory_pipeline::{Mode, PipelinePhase, RefreshOutcome, RenderedSnapshot};
use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Pipeline error rendered as a JSON body with the matching status.
pub struct ApiError(pub AdvisoryError);

impl From<AdvisoryError> for ApiError {
    fn from(err: AdvisoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModeRequest {
    pub live: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModeResponse {
    pub mode: Mode,
    pub live: bool,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub mode: Mode,
    pub generation: u64,
    pub phase: PipelinePhase,
    pub snapshot: Option<RenderedSnapshot>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshResponse {
    Applied { snapshot: RenderedSnapshot },
    Stale { generation: u64, latest: u64 },
}

impl From<RefreshOutcome> for RefreshResponse {
    fn from(outcome: RefreshOutcome) -> Self {
        match outcome {
            RefreshOutcome::Applied(snapshot) => RefreshResponse::Applied { snapshot },
            RefreshOutcome::Stale { generation, latest } => {
                RefreshResponse::Stale { generation, latest }
            }
        }
    }
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tsunami-map",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Current overlay as a GeoJSON FeatureCollection.
pub async fn overlay_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let overlay = state
        .controller
        .pipeline()
        .with_surface(|surface| surface.to_feature_collection())
        .await;
    (
        [(header::CONTENT_TYPE, "application/geo+json")],
        Json(overlay),
    )
}

pub async fn snapshot_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let pipeline = state.controller.pipeline();
    Json(SnapshotResponse {
        mode: state.controller.current().await,
        generation: pipeline.generation(),
        phase: pipeline.phase().await,
        snapshot: pipeline.snapshot().await,
    })
}

pub async fn get_mode_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let mode = state.controller.current().await;
    Json(ModeResponse {
        mode,
        live: mode.is_live(),
    })
}

/// Switch mode: clears the map, then renders from the selected source.
pub async fn set_mode_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let outcome = state.controller.set_mode(request.live).await?;
    Ok(Json(outcome.into()))
}

pub async fn refresh_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let outcome = state.controller.refresh().await?;
    Ok(Json(outcome.into()))
}

pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}
