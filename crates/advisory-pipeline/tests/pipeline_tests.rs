//! Refresh-cycle tests against a recording surface.

mod common;

use std::sync::Arc;

use advisory_common::{AdvisoryRecord, Grade, VisualTreatment};
use advisory_pipeline::{
    Mode, OverlaySurface, PipelineConfig, PipelinePhase, RefreshOutcome, RenderingPipeline,
};
use advisory_source::FixtureSource;
use common::{fixture, recording_pipeline, FailingSource, GatedSource, SurfaceCall};
use test_utils::{
    aomori_watch, assert_coord_approx_eq, fixtures::names, fukushima_warning, region_registry,
    unknown_region_warning,
};
use tokio::sync::Notify;

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_fukushima_warning_end_to_end() {
    let pipeline = recording_pipeline(
        Arc::new(FailingSource),
        fixture(vec![fukushima_warning()]),
    );

    let outcome = pipeline.refresh(Mode::Fixture).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.mode, Mode::Fixture);
    assert_eq!(snapshot.styled.len(), 1);
    assert!(snapshot.unmatched.is_empty());

    pipeline
        .with_surface(|surface| {
            let styles = surface.styles();
            assert_eq!(styles.len(), 1);
            assert_eq!(styles[0].0, names::FUKUSHIMA);
            assert_eq!(styles[0].1, VisualTreatment::warning());

            let labels = surface.labels();
            assert_eq!(labels.len(), 1);
            assert_eq!(labels[0].1, "10m");
            assert_coord_approx_eq!(labels[0].0, (37.75, 140.47), 1e-9);
        })
        .await;
}

#[tokio::test]
async fn test_unknown_region_touches_nothing() {
    let pipeline = recording_pipeline(
        Arc::new(FailingSource),
        fixture(vec![unknown_region_warning()]),
    );

    let outcome = pipeline.refresh(Mode::Fixture).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();
    assert_eq!(snapshot.unmatched, vec![names::NOWHERE.to_string()]);
    assert!(snapshot.styled.is_empty());
    assert!(snapshot.labels.is_empty());

    pipeline
        .with_surface(|surface| {
            assert_eq!(surface.since_clear(), &[] as &[SurfaceCall]);
        })
        .await;
}

#[tokio::test]
async fn test_watch_is_styled_but_not_labelled() {
    let pipeline = recording_pipeline(Arc::new(FailingSource), fixture(vec![aomori_watch()]));
    pipeline.refresh(Mode::Fixture).await.unwrap();

    pipeline
        .with_surface(|surface| {
            assert_eq!(
                surface.treatment_of(names::AOMORI_PACIFIC),
                Some(VisualTreatment::watch())
            );
            assert!(surface.labels().is_empty());
        })
        .await;
}

#[tokio::test]
async fn test_calls_follow_record_order() {
    let pipeline = recording_pipeline(
        Arc::new(FailingSource),
        fixture(vec![aomori_watch(), fukushima_warning()]),
    );
    pipeline.refresh(Mode::Fixture).await.unwrap();

    pipeline
        .with_surface(|surface| {
            let kinds: Vec<String> = surface
                .calls
                .iter()
                .map(|c| match c {
                    SurfaceCall::Style(name, _) => format!("style:{}", name),
                    SurfaceCall::Popup(name, _) => format!("popup:{}", name),
                    SurfaceCall::Label(_, text) => format!("label:{}", text),
                    SurfaceCall::Clear => "clear".to_string(),
                })
                .collect();
            assert_eq!(
                kinds,
                vec![
                    "clear".to_string(),
                    format!("style:{}", names::AOMORI_PACIFIC),
                    format!("popup:{}", names::AOMORI_PACIFIC),
                    format!("style:{}", names::FUKUSHIMA),
                    format!("popup:{}", names::FUKUSHIMA),
                    "label:10m".to_string(),
                ]
            );
        })
        .await;
}

#[tokio::test]
async fn test_later_record_for_same_region_wins() {
    let pipeline = recording_pipeline(
        Arc::new(FailingSource),
        fixture(vec![
            fukushima_warning(),
            AdvisoryRecord::new(names::FUKUSHIMA, Grade::Watch),
        ]),
    );
    let outcome = pipeline.refresh(Mode::Fixture).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();

    assert_eq!(snapshot.styled.len(), 1);
    assert_eq!(snapshot.styled[0].grade, Grade::Watch);
    pipeline
        .with_surface(|surface| {
            assert_eq!(
                surface.treatment_of(names::FUKUSHIMA),
                Some(VisualTreatment::watch())
            );
        })
        .await;
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_failed_acquisition_preserves_previous_state() {
    let pipeline = recording_pipeline(
        Arc::new(FailingSource),
        fixture(vec![fukushima_warning()]),
    );
    pipeline.refresh(Mode::Fixture).await.unwrap();
    let calls_before = pipeline.with_surface(|s| s.calls.len()).await;
    let snapshot_before = pipeline.snapshot().await;

    let err = pipeline.refresh(Mode::Live).await.unwrap_err();
    assert!(err.is_acquisition());

    assert_eq!(pipeline.with_surface(|s| s.calls.len()).await, calls_before);
    assert_eq!(pipeline.snapshot().await, snapshot_before);
    assert_eq!(pipeline.phase().await, PipelinePhase::Idle);
}

#[tokio::test]
async fn test_empty_snapshot_clears_surface() {
    let pipeline = recording_pipeline(Arc::new(FailingSource), fixture(vec![]));
    let outcome = pipeline.refresh(Mode::Fixture).await.unwrap();
    assert_eq!(outcome.snapshot().unwrap().record_count, 0);
    pipeline
        .with_surface(|surface| assert_eq!(surface.calls, vec![SurfaceCall::Clear]))
        .await;
}

// ============================================================================
// Generations
// ============================================================================

#[tokio::test]
async fn test_stale_acquisition_is_discarded() {
    let gate = Arc::new(Notify::new());
    let slow_live = Arc::new(GatedSource {
        records: vec![AdvisoryRecord::new(names::MIYAGI, Grade::Warning)],
        gate: gate.clone(),
    });
    let pipeline = recording_pipeline(slow_live, fixture(vec![fukushima_warning()]));

    let background = pipeline.clone();
    let slow = tokio::spawn(async move { background.refresh(Mode::Live).await });

    while pipeline.generation() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(
        pipeline.phase().await,
        PipelinePhase::Loading { generation: 1 }
    );

    let fresh = pipeline.refresh(Mode::Fixture).await.unwrap();
    assert_eq!(fresh.snapshot().unwrap().generation, 2);

    gate.notify_one();
    let stale = slow.await.unwrap().unwrap();
    assert_eq!(
        stale,
        RefreshOutcome::Stale {
            generation: 1,
            latest: 2
        }
    );

    pipeline
        .with_surface(|surface| {
            assert!(surface.treatment_of(names::MIYAGI).is_none());
            assert_eq!(
                surface.treatment_of(names::FUKUSHIMA),
                Some(VisualTreatment::warning())
            );
        })
        .await;
    assert_eq!(pipeline.snapshot().await.unwrap().generation, 2);
    assert_eq!(pipeline.phase().await, PipelinePhase::Idle);
}

#[tokio::test]
async fn test_generation_increases_per_refresh() {
    let pipeline = recording_pipeline(Arc::new(FailingSource), fixture(vec![]));
    assert_eq!(pipeline.generation(), 0);
    pipeline.refresh(Mode::Fixture).await.unwrap();
    let _ = pipeline.refresh(Mode::Live).await;
    pipeline.refresh(Mode::Fixture).await.unwrap();
    assert_eq!(pipeline.generation(), 3);
    assert_eq!(pipeline.snapshot().await.unwrap().generation, 3);
}

// ============================================================================
// Overlay surface
// ============================================================================

#[tokio::test]
async fn test_overlay_surface_pipeline() {
    let registry = Arc::new(region_registry());
    let surface = OverlaySurface::new(&registry, VisualTreatment::neutral());
    let pipeline = RenderingPipeline::new(
        registry,
        Arc::new(FailingSource),
        Arc::new(FixtureSource::builtin()),
        surface,
        PipelineConfig::default(),
    );

    pipeline.refresh(Mode::Fixture).await.unwrap();

    let overlay = pipeline
        .with_surface(|surface| surface.to_feature_collection())
        .await;
    let fukushima = overlay
        .features
        .iter()
        .find(|f| f.property_str("name") == Some(names::FUKUSHIMA))
        .unwrap();
    assert_eq!(fukushima.properties["style"]["fillColor"], "red");
    assert!(fukushima
        .property_str("popup")
        .unwrap()
        .contains("最大津波高: 3m"));

    // The built-in fixture has no coordinates, so no labels
    assert!(overlay
        .features
        .iter()
        .all(|f| f.property_str("kind") == Some("region")));
}
