//! Resolve advisory records to registry regions by name.

use advisory_common::{AdvisoryRecord, Region, RegionRegistry};

/// Result of looking up a record's region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionMatch<'a> {
    Found(&'a Region),
    NotFound,
}

impl<'a> RegionMatch<'a> {
    pub fn region(&self) -> Option<&'a Region> {
        match self {
            RegionMatch::Found(region) => Some(region),
            RegionMatch::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RegionMatch::Found(_))
    }
}

/// Exact, case-sensitive name match. Among duplicate names the first
/// registry entry is bound.
pub fn match_record<'a>(record: &AdvisoryRecord, registry: &'a RegionRegistry) -> RegionMatch<'a> {
    match registry.get(&record.name) {
        Some(region) => RegionMatch::Found(region),
        None => RegionMatch::NotFound,
    }
}

/// Match every record, preserving source order.
pub fn match_records<'r, 'a>(
    records: &'r [AdvisoryRecord],
    registry: &'a RegionRegistry,
) -> Vec<(&'r AdvisoryRecord, RegionMatch<'a>)> {
    records
        .iter()
        .map(|record| (record, match_record(record, registry)))
        .collect()
}
