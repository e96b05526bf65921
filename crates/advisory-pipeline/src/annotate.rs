//! Floating peak-height labels.
//!
//! Labels are placed only at a record's explicit coordinates; positions
//! are never derived from region geometry.

use advisory_common::{AdvisoryRecord, Coordinate, Grade};
use serde::{Deserialize, Serialize};

use crate::matcher::RegionMatch;

/// Unit suffix appended to label heights.
pub const HEIGHT_UNIT: &str = "m";

/// Which grades receive a height label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Only `Warning` records are labelled.
    #[default]
    WarningOnly,
    /// Every record with a height and coordinates is labelled.
    AnyGrade,
}

impl LabelPolicy {
    pub fn is_eligible(&self, grade: &Grade) -> bool {
        match self {
            LabelPolicy::WarningOnly => *grade == Grade::Warning,
            LabelPolicy::AnyGrade => true,
        }
    }
}

/// Label placement settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub policy: LabelPolicy,

    /// Also label records whose region is not in the registry.
    #[serde(default)]
    pub label_unmatched: bool,
}

/// A placed height label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub coordinate: Coordinate,
    pub text: String,
    /// Name of the advisory record the label belongs to.
    pub region: String,
}

/// Derives labels from matched records.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    config: LabelConfig,
}

impl Annotator {
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn annotate(&self, record: &AdvisoryRecord, matched: &RegionMatch<'_>) -> Option<Label> {
        if !matched.is_found() && !self.config.label_unmatched {
            return None;
        }
        if !self.config.policy.is_eligible(&record.grade) {
            return None;
        }

        let height = record.height_value().filter(|h| h.is_finite())?;
        let coordinate = record.coordinates?;

        Some(Label {
            coordinate,
            text: format_height(height),
            region: record.name.clone(),
        })
    }
}

/// `10.0` renders as `10m`, `0.5` as `0.5m`.
pub fn format_height(value: f64) -> String {
    format!("{}{}", value, HEIGHT_UNIT)
}
