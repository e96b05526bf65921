//! Application state and the background refresh loop.

use std::sync::Arc;
use std::time::Duration;

use advisory_common::RegionRegistry;
use advisory_pipeline::{ModeController, OverlaySurface, RenderingPipeline};
use advisory_source::{AdvisorySource, FixtureSource, LiveSource};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::MapConfig;

/// Shared application state.
pub struct AppState {
    pub controller: ModeController<OverlaySurface>,
    pub config: MapConfig,
}

impl AppState {
    /// Load the region registry from `config.regions_path` and wire the pipeline.
    pub fn from_config(config: MapConfig) -> Result<Self> {
        let registry = RegionRegistry::from_file(&config.regions_path, config.duplicate_policy())
            .with_context(|| {
                format!(
                    "Failed to load region boundaries from {}",
                    config.regions_path.display()
                )
            })?;
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: MapConfig, registry: RegionRegistry) -> Result<Self> {
        for name in registry.duplicates() {
            warn!(region = %name, "Duplicate boundary name, keeping the first feature");
        }
        if registry.skipped() > 0 {
            warn!(count = registry.skipped(), "Skipped boundary features without a name");
        }
        info!(regions = registry.len(), "Region registry loaded");

        let live: Arc<dyn AdvisorySource> = Arc::new(LiveSource::new(config.live.clone())?);
        let fixture: Arc<dyn AdvisorySource> = match &config.fixture_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
                let source = FixtureSource::from_json(&json)
                    .with_context(|| format!("Invalid fixture file: {}", path.display()))?;
                info!(path = %path.display(), records = source.records().len(), "Loaded fixture file");
                Arc::new(source)
            }
            None => Arc::new(FixtureSource::builtin()),
        };

        let registry = Arc::new(registry);
        let surface = OverlaySurface::new(&registry, config.treatments.default.clone());
        let pipeline = RenderingPipeline::new(
            registry,
            live,
            fixture,
            surface,
            config.pipeline_config(),
        );
        let controller = ModeController::new(Arc::new(pipeline), config.mode);

        Ok(Self { controller, config })
    }

    /// Render the configured startup mode. Failures are logged, not returned.
    pub async fn initial_load(&self) {
        let mode = self.controller.current().await;
        if let Err(e) = self.controller.set(mode).await {
            error!(mode = %mode, error = %e, "Initial advisory load failed");
        }
    }

    /// Re-render the current mode every `poll_interval_secs`.
    pub async fn run_forever(self: Arc<Self>) {
        let interval = Duration::from_secs(self.config.poll_interval_secs.max(1));
        info!(interval_secs = interval.as_secs(), "Starting advisory polling loop");

        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; the initial load already covered it
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match self.controller.refresh().await {
                Ok(outcome) => {
                    if let Some(snapshot) = outcome.snapshot() {
                        info!(
                            generation = snapshot.generation,
                            styled = snapshot.styled.len(),
                            "Polled advisories"
                        );
                    }
                }
                Err(e) => error!(error = %e, "Advisory poll failed"),
            }
        }
    }
}
