//! Static advisory fixture for offline development and testing.

use advisory_common::{AdvisoryRecord, AdvisoryResult, FirstHeight, Grade};
use async_trait::async_trait;
use tracing::debug;

use crate::AdvisorySource;

/// Serves a fixed list of records.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    records: Vec<AdvisoryRecord>,
}

impl FixtureSource {
    pub fn new(records: Vec<AdvisoryRecord>) -> Self {
        Self { records }
    }

    /// The built-in snapshot: a warning for Fukushima and a watch for the
    /// Aomori Pacific coast.
    pub fn builtin() -> Self {
        Self::new(vec![
            AdvisoryRecord::new("福島県", Grade::Warning)
                .with_max_height(3.0, "３ｍ")
                .with_first_height(FirstHeight::Condition {
                    condition: "津波到達中と推測".to_string(),
                }),
            AdvisoryRecord::new("青森県太平洋沿岸", Grade::Watch)
                .with_max_height(1.0, "１ｍ")
                .with_first_height(FirstHeight::Arrival {
                    arrival_time: "2019/06/18 22:40:00".to_string(),
                }),
        ])
    }

    /// Parse an `areas` array in the live feed's record shape.
    pub fn from_json(json: &str) -> AdvisoryResult<Self> {
        let records: Vec<AdvisoryRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[AdvisoryRecord] {
        &self.records
    }
}

#[async_trait]
impl AdvisorySource for FixtureSource {
    async fn fetch(&self) -> AdvisoryResult<Vec<AdvisoryRecord>> {
        debug!(count = self.records.len(), "Serving fixture advisories");
        Ok(self.records.clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
