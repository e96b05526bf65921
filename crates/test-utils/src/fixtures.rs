//! Common test fixtures for the tsunami map.
//!
//! Region polygons are coarse boxes around the real forecast areas; only
//! the names matter to the pipeline.

use advisory_common::{AdvisoryRecord, DuplicatePolicy, FirstHeight, Grade, RegionRegistry};

/// Forecast region names used across the fixtures.
pub mod names {
    pub const FUKUSHIMA: &str = "福島県";
    pub const AOMORI_PACIFIC: &str = "青森県太平洋沿岸";
    pub const MIYAGI: &str = "宮城県";
    pub const IWATE: &str = "岩手県";
    /// A name no registry fixture contains.
    pub const NOWHERE: &str = "存在しない予報区";
}

/// Label position for Fukushima used by the end-to-end scenario.
pub const FUKUSHIMA_LABEL: [f64; 2] = [37.75, 140.47];

/// Boundary collection with four distinct regions.
pub const REGIONS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "name": "福島県", "grade": "Warning" },
      "geometry": { "type": "Polygon", "coordinates": [[[140.6, 36.8], [141.1, 36.8], [141.1, 37.9], [140.6, 37.9], [140.6, 36.8]]] }
    },
    {
      "type": "Feature",
      "properties": { "name": "青森県太平洋沿岸", "grade": "Watch" },
      "geometry": { "type": "Polygon", "coordinates": [[[141.2, 40.4], [141.7, 40.4], [141.7, 41.5], [141.2, 41.5], [141.2, 40.4]]] }
    },
    {
      "type": "Feature",
      "properties": { "name": "宮城県" },
      "geometry": { "type": "Polygon", "coordinates": [[[140.9, 37.9], [141.7, 37.9], [141.7, 38.9], [140.9, 38.9], [140.9, 37.9]]] }
    },
    {
      "type": "Feature",
      "properties": { "name": "岩手県" },
      "geometry": { "type": "Polygon", "coordinates": [[[141.5, 38.9], [142.1, 38.9], [142.1, 40.4], [141.5, 40.4], [141.5, 38.9]]] }
    }
  ]
}"#;

/// Boundary collection where "福島県" appears twice and one feature has no name.
pub const DUPLICATE_REGIONS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "id": "first", "properties": { "name": "福島県" }, "geometry": { "type": "Point", "coordinates": [140.9, 37.4] } },
    { "type": "Feature", "properties": { "name": "宮城県" }, "geometry": { "type": "Point", "coordinates": [141.2, 38.3] } },
    { "type": "Feature", "id": "second", "properties": { "name": "福島県" }, "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
    { "type": "Feature", "properties": { "label": "unnamed" }, "geometry": null }
  ]
}"#;

/// Registry built from [`REGIONS_GEOJSON`].
pub fn region_registry() -> RegionRegistry {
    RegionRegistry::from_geojson_str(REGIONS_GEOJSON, DuplicatePolicy::FirstMatchWins)
        .expect("fixture regions parse")
}

/// Warning for Fukushima with a 10m height and an explicit label position.
pub fn fukushima_warning() -> AdvisoryRecord {
    AdvisoryRecord::new(names::FUKUSHIMA, Grade::Warning)
        .with_max_height(10.0, "１０ｍ超")
        .with_first_height(FirstHeight::Condition {
            condition: "津波到達中と推測".to_string(),
        })
        .with_coordinates(FUKUSHIMA_LABEL[0], FUKUSHIMA_LABEL[1])
}

/// Watch for Aomori (Pacific coast) with a height and coordinates.
pub fn aomori_watch() -> AdvisoryRecord {
    AdvisoryRecord::new(names::AOMORI_PACIFIC, Grade::Watch)
        .with_max_height(1.0, "１ｍ")
        .with_first_height(FirstHeight::Arrival {
            arrival_time: "2019/06/18 22:40:00".to_string(),
        })
        .with_coordinates(40.9, 141.4)
}

/// Warning for a region that no fixture registry contains.
pub fn unknown_region_warning() -> AdvisoryRecord {
    AdvisoryRecord::new(names::NOWHERE, Grade::Warning)
        .with_max_height(5.0, "５ｍ")
        .with_coordinates(35.0, 139.0)
}

/// A raw history response body in the live feed's shape.
pub fn history_response(areas: serde_json::Value, cancelled: bool) -> String {
    serde_json::json!([
        {
            "id": "5d09ce9b4bd3bd5f6a2a4b5e",
            "code": 552,
            "time": "2019/06/18 22:24:31.478",
            "cancelled": cancelled,
            "issue": { "source": "気象庁", "time": "2019/06/18 22:24:00", "type": "Focus" },
            "areas": areas,
        }
    ])
    .to_string()
}
