//! Live / fixture mode switching.

use std::sync::Arc;

use advisory_common::AdvisoryResult;
use advisory_source::Mode;
use tokio::sync::RwLock;
use tracing::info;

use crate::pipeline::{RefreshOutcome, RenderingPipeline};
use crate::surface::RenderSurface;

/// Holds the selected mode and re-renders on every change.
pub struct ModeController<S> {
    pipeline: Arc<RenderingPipeline<S>>,
    mode: RwLock<Mode>,
}

impl<S: RenderSurface> ModeController<S> {
    pub fn new(pipeline: Arc<RenderingPipeline<S>>, initial: Mode) -> Self {
        Self {
            pipeline,
            mode: RwLock::new(initial),
        }
    }

    pub fn pipeline(&self) -> &Arc<RenderingPipeline<S>> {
        &self.pipeline
    }

    pub async fn current(&self) -> Mode {
        *self.mode.read().await
    }

    /// Switch to the live feed (`true`) or the fixture (`false`).
    pub async fn set_mode(&self, live: bool) -> AdvisoryResult<RefreshOutcome> {
        self.set(Mode::from_live(live)).await
    }

    /// Tear down the current overlays, then render from `mode`'s source.
    ///
    /// Re-selecting the current mode still clears and re-renders. The mode
    /// lock is held until the cycle has its generation, so generations are
    /// handed out in the same order as mode changes and only the latest
    /// change can apply.
    pub async fn set(&self, mode: Mode) -> AdvisoryResult<RefreshOutcome> {
        let generation = {
            let mut current = self.mode.write().await;
            let previous = std::mem::replace(&mut *current, mode);
            info!(from = %previous, to = %mode, "Switching advisory mode");

            self.pipeline.clear().await;
            self.pipeline.begin().await
        };
        self.pipeline.complete(generation, mode).await
    }

    /// Re-run the pipeline for the current mode without clearing first.
    pub async fn refresh(&self) -> AdvisoryResult<RefreshOutcome> {
        let (mode, generation) = {
            let current = self.mode.read().await;
            (*current, self.pipeline.begin().await)
        };
        self.pipeline.complete(generation, mode).await
    }
}
