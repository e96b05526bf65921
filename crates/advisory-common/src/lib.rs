//! Common types shared across the tsunami advisory map crates.

pub mod error;
pub mod geojson;
pub mod record;
pub mod region;
pub mod style;

pub use error::{AdvisoryError, AdvisoryResult};
pub use geojson::{Feature, FeatureCollection};
pub use record::{AdvisoryRecord, Coordinate, FirstHeight, Grade, MaxHeight};
pub use region::{DuplicatePolicy, Region, RegionRegistry};
pub use style::{Color, TreatmentTable, VisualTreatment};
