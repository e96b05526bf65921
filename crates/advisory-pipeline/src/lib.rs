//! Advisory styling pipeline.
//!
//! Binds advisory records to forecast regions by name, styles each region
//! by severity, attaches popups and places height labels on a
//! [`RenderSurface`]. Each refresh replaces the previous rendered state.

pub mod annotate;
pub mod classify;
pub mod matcher;
pub mod mode;
pub mod pipeline;
pub mod popup;
pub mod surface;

pub use advisory_source::Mode;
pub use annotate::{Annotator, Label, LabelConfig, LabelPolicy, HEIGHT_UNIT};
pub use classify::{classify, SeverityClassifier};
pub use matcher::{match_record, match_records, RegionMatch};
pub use mode::ModeController;
pub use pipeline::{
    PipelineConfig, PipelinePhase, RefreshOutcome, RenderedSnapshot, RenderingPipeline,
    SnapshotRenderer, StyledRegion,
};
pub use popup::popup_html;
pub use surface::{OverlaySurface, RenderSurface};
