//! Severity grade to visual treatment.

use advisory_common::{Grade, TreatmentTable, VisualTreatment};

/// Maps grades onto a treatment table. Total: unknown grades get the
/// table's default treatment.
#[derive(Debug, Clone, Default)]
pub struct SeverityClassifier {
    table: TreatmentTable,
}

impl SeverityClassifier {
    pub fn new(table: TreatmentTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, grade: &Grade) -> &VisualTreatment {
        match grade {
            Grade::Warning => &self.table.warning,
            Grade::Watch => &self.table.watch,
            Grade::Other(_) => &self.table.default,
        }
    }

    pub fn classify_code(&self, code: &str) -> &VisualTreatment {
        self.classify(&Grade::from_code(code))
    }

    /// Treatment of a region with no active advisory.
    pub fn neutral(&self) -> &VisualTreatment {
        &self.table.default
    }

    pub fn table(&self) -> &TreatmentTable {
        &self.table
    }
}

/// Classify a grade code against the built-in treatments only.
///
/// Configured tables go through a [`SeverityClassifier`].
pub fn classify(code: &str) -> VisualTreatment {
    SeverityClassifier::default().classify_code(code).clone()
}
