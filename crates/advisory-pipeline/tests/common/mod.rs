//! Shared helpers for pipeline integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use advisory_common::{
    AdvisoryError, AdvisoryRecord, AdvisoryResult, Coordinate, Region, VisualTreatment,
};
use advisory_pipeline::{PipelineConfig, RenderSurface, RenderingPipeline};
use advisory_source::{AdvisorySource, FixtureSource};
use async_trait::async_trait;
use tokio::sync::Notify;

/// One call made against the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Style(String, VisualTreatment),
    Popup(String, String),
    Label(Coordinate, String),
    Clear,
}

/// Surface that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    /// Calls made since the most recent clear.
    pub fn since_clear(&self) -> &[SurfaceCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == SurfaceCall::Clear)
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }

    pub fn styles(&self) -> Vec<(String, VisualTreatment)> {
        self.since_clear()
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Style(name, t) => Some((name.clone(), t.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<(Coordinate, String)> {
        self.since_clear()
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Label(coord, text) => Some((*coord, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Final treatment per region after replaying the calls since the last clear.
    pub fn treatment_of(&self, name: &str) -> Option<VisualTreatment> {
        self.styles()
            .into_iter()
            .filter(|(n, _)| n == name)
            .map(|(_, t)| t)
            .last()
    }
}

impl RenderSurface for RecordingSurface {
    fn apply_style(&mut self, region: &Region, treatment: &VisualTreatment) {
        self.calls
            .push(SurfaceCall::Style(region.name.clone(), treatment.clone()));
    }

    fn bind_popup(&mut self, region: &Region, html: &str) {
        self.calls
            .push(SurfaceCall::Popup(region.name.clone(), html.to_string()));
    }

    fn place_label(&mut self, coordinate: Coordinate, text: &str) {
        self.calls.push(SurfaceCall::Label(coordinate, text.to_string()));
    }

    fn clear_overlays(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }
}

/// Source that always fails like an unreachable feed.
pub struct FailingSource;

#[async_trait]
impl AdvisorySource for FailingSource {
    async fn fetch(&self) -> AdvisoryResult<Vec<AdvisoryRecord>> {
        Err(AdvisoryError::Acquisition("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Source that blocks until released, then returns its records.
pub struct GatedSource {
    pub records: Vec<AdvisoryRecord>,
    pub gate: Arc<Notify>,
}

#[async_trait]
impl AdvisorySource for GatedSource {
    async fn fetch(&self) -> AdvisoryResult<Vec<AdvisoryRecord>> {
        self.gate.notified().await;
        Ok(self.records.clone())
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

pub fn fixture(records: Vec<AdvisoryRecord>) -> Arc<dyn AdvisorySource> {
    Arc::new(FixtureSource::new(records))
}

/// Pipeline over the fixture registry with a recording surface.
pub fn recording_pipeline(
    live: Arc<dyn AdvisorySource>,
    fixture: Arc<dyn AdvisorySource>,
) -> Arc<RenderingPipeline<RecordingSurface>> {
    Arc::new(RenderingPipeline::new(
        Arc::new(test_utils::region_registry()),
        live,
        fixture,
        RecordingSurface::default(),
        PipelineConfig::default(),
    ))
}
