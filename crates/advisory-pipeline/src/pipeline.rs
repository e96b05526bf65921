//! Refresh cycle orchestration.
//!
//! A refresh moves `Idle -> Loading -> Applying -> Idle`. Every cycle takes
//! a generation number when it starts; results are applied only if that
//! generation is still the latest, so a slow acquisition can't overwrite
//! the results of a newer refresh or mode change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use advisory_common::{AdvisoryRecord, AdvisoryResult, Grade, RegionRegistry, TreatmentTable};
use advisory_source::{AdvisorySource, Mode};
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::annotate::{Annotator, Label, LabelConfig};
use crate::classify::SeverityClassifier;
use crate::matcher::{match_records, RegionMatch};
use crate::popup::popup_html;
use crate::surface::RenderSurface;

/// Styling and labelling settings for the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub treatments: TreatmentTable,

    #[serde(default)]
    pub labels: LabelConfig,
}

/// Where the pipeline is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelinePhase {
    Idle,
    Loading { generation: u64 },
    Applying { generation: u64 },
}

/// A region styled by the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRegion {
    pub name: String,
    pub grade: Grade,
}

/// Everything one refresh put on the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSnapshot {
    pub generation: u64,
    pub mode: Mode,
    pub record_count: usize,
    /// Final state per region; a later record for the same region replaces
    /// an earlier one.
    pub styled: Vec<StyledRegion>,
    pub labels: Vec<Label>,
    /// Record names with no registry counterpart, in source order.
    pub unmatched: Vec<String>,
    pub rendered_at: DateTime<Utc>,
}

/// Result of a refresh that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied(RenderedSnapshot),
    /// A newer cycle started while this one was loading; nothing was applied.
    Stale { generation: u64, latest: u64 },
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&RenderedSnapshot> {
        match self {
            RefreshOutcome::Applied(snapshot) => Some(snapshot),
            RefreshOutcome::Stale { .. } => None,
        }
    }
}

/// Applies one snapshot of records to a surface. Synchronous and
/// side-effect free apart from the surface calls.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRenderer {
    classifier: SeverityClassifier,
    annotator: Annotator,
}

impl SnapshotRenderer {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            classifier: SeverityClassifier::new(config.treatments),
            annotator: Annotator::new(config.labels),
        }
    }

    pub fn classifier(&self) -> &SeverityClassifier {
        &self.classifier
    }

    /// Clear the surface and render `records` in order.
    pub fn render<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        registry: &RegionRegistry,
        records: &[AdvisoryRecord],
        generation: u64,
        mode: Mode,
    ) -> RenderedSnapshot {
        surface.clear_overlays();

        let mut styled: Vec<StyledRegion> = Vec::new();
        let mut labels = Vec::new();
        let mut unmatched = Vec::new();

        for (record, matched) in match_records(records, registry) {
            let treatment = self.classifier.classify(&record.grade);

            match matched {
                RegionMatch::Found(region) => {
                    surface.apply_style(region, treatment);
                    surface.bind_popup(region, &popup_html(record));

                    match styled.iter_mut().find(|s| s.name == region.name) {
                        Some(existing) => existing.grade = record.grade.clone(),
                        None => styled.push(StyledRegion {
                            name: region.name.clone(),
                            grade: record.grade.clone(),
                        }),
                    }
                }
                RegionMatch::NotFound => {
                    debug!(region = %record.name, "No matching region, skipping styling");
                    unmatched.push(record.name.clone());
                }
            }

            if let Some(label) = self.annotator.annotate(record, &matched) {
                surface.place_label(label.coordinate, &label.text);
                labels.push(label);
            }
        }

        RenderedSnapshot {
            generation,
            mode,
            record_count: records.len(),
            styled,
            labels,
            unmatched,
            rendered_at: Utc::now(),
        }
    }
}

struct PipelineState<S> {
    surface: S,
    phase: PipelinePhase,
    snapshot: Option<RenderedSnapshot>,
}

/// Owns the rendering surface and runs refresh cycles against it.
pub struct RenderingPipeline<S> {
    registry: Arc<RegionRegistry>,
    live: Arc<dyn AdvisorySource>,
    fixture: Arc<dyn AdvisorySource>,
    renderer: SnapshotRenderer,
    generation: AtomicU64,
    state: Mutex<PipelineState<S>>,
}

impl<S: RenderSurface> RenderingPipeline<S> {
    pub fn new(
        registry: Arc<RegionRegistry>,
        live: Arc<dyn AdvisorySource>,
        fixture: Arc<dyn AdvisorySource>,
        surface: S,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            live,
            fixture,
            renderer: SnapshotRenderer::new(config),
            generation: AtomicU64::new(0),
            state: Mutex::new(PipelineState {
                surface,
                phase: PipelinePhase::Idle,
                snapshot: None,
            }),
        }
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Latest generation handed out.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn phase(&self) -> PipelinePhase {
        self.state.lock().await.phase
    }

    /// The snapshot currently on the surface, if any.
    pub async fn snapshot(&self) -> Option<RenderedSnapshot> {
        self.state.lock().await.snapshot.clone()
    }

    /// Read the surface under the pipeline lock.
    pub async fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.surface)
    }

    fn source_for(&self, mode: Mode) -> &Arc<dyn AdvisorySource> {
        match mode {
            Mode::Live => &self.live,
            Mode::Fixture => &self.fixture,
        }
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        gauge!("advisory_generation").set(generation as f64);
        generation
    }

    /// Tear down the rendered snapshot and invalidate in-flight cycles.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let generation = self.next_generation();
        state.surface.clear_overlays();
        state.snapshot = None;
        state.phase = PipelinePhase::Idle;
        gauge!("advisory_styled_regions").set(0.0);
        info!(generation, "Cleared rendered overlays");
    }

    /// Run one refresh cycle against the source selected by `mode`.
    ///
    /// Acquisition failures are logged and returned; the surface is left
    /// untouched in that case.
    pub async fn refresh(&self, mode: Mode) -> AdvisoryResult<RefreshOutcome> {
        let generation = self.begin().await;
        self.complete(generation, mode).await
    }

    /// Start a cycle: take the next generation and enter `Loading`.
    pub(crate) async fn begin(&self) -> u64 {
        let mut state = self.state.lock().await;
        let generation = self.next_generation();
        state.phase = PipelinePhase::Loading { generation };
        counter!("advisory_refresh_total").increment(1);
        generation
    }

    /// Fetch and apply for a cycle started with [`Self::begin`].
    #[instrument(skip(self))]
    pub(crate) async fn complete(
        &self,
        generation: u64,
        mode: Mode,
    ) -> AdvisoryResult<RefreshOutcome> {
        let source = self.source_for(mode);
        debug!(generation, source = source.name(), "Loading advisories");
        let fetched = source.fetch().await;

        let mut state = self.state.lock().await;
        let latest = self.generation();

        if generation != latest {
            counter!("advisory_refresh_stale_total").increment(1);
            warn!(generation, latest, "Discarding stale refresh");
            return Ok(RefreshOutcome::Stale { generation, latest });
        }

        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                counter!("advisory_refresh_failures_total").increment(1);
                warn!(generation, error = %e, "Advisory acquisition failed, keeping previous overlays");
                state.phase = PipelinePhase::Idle;
                return Err(e);
            }
        };

        state.phase = PipelinePhase::Applying { generation };
        let snapshot =
            self.renderer
                .render(&mut state.surface, &self.registry, &records, generation, mode);

        counter!("advisory_regions_styled_total").increment(snapshot.styled.len() as u64);
        counter!("advisory_regions_unmatched_total").increment(snapshot.unmatched.len() as u64);
        counter!("advisory_labels_placed_total").increment(snapshot.labels.len() as u64);
        gauge!("advisory_styled_regions").set(snapshot.styled.len() as f64);

        info!(
            generation,
            records = snapshot.record_count,
            styled = snapshot.styled.len(),
            labels = snapshot.labels.len(),
            unmatched = snapshot.unmatched.len(),
            "Applied advisory snapshot"
        );

        state.snapshot = Some(snapshot.clone());
        state.phase = PipelinePhase::Idle;
        Ok(RefreshOutcome::Applied(snapshot))
    }
}
