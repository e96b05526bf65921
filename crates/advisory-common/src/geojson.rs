//! Minimal GeoJSON types for region boundaries and overlay output.
//!
//! Geometry stays opaque (`serde_json::Value`); the map only needs names
//! and properties, and hands geometry back to the client untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature with opaque geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub geometry: Value,

    /// `null` in the source is read as an empty map.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    /// Create a feature wrapping existing geometry.
    pub fn new(geometry: Value) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry,
            properties: Map::new(),
        }
    }

    /// Create a point feature. GeoJSON order is `[lon, lat]`.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::new(serde_json::json!({
            "type": "Point",
            "coordinates": [lon, lat],
        }))
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// String property lookup.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_feature_uses_lon_lat_order() {
        let feature = Feature::point(140.47, 37.75).with_property("text", "10m");
        let json = serde_json::to_value(&feature).unwrap();

        assert_eq!(json["type"], "Feature");
        assert_eq!(json["geometry"]["type"], "Point");
        assert_eq!(json["geometry"]["coordinates"][0], 140.47);
        assert_eq!(json["geometry"]["coordinates"][1], 37.75);
        assert_eq!(json["properties"]["text"], "10m");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_collection_parses_without_geometry() {
        let fc = FeatureCollection::from_json(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"name": "福島県"}},
                {"type": "Feature", "properties": null, "geometry": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(fc.features.len(), 2);
        assert!(fc.features[1].properties.is_empty());
        assert_eq!(fc.features[0].property_str("name"), Some("福島県"));
        assert!(fc.features[0].geometry.is_null());
    }
}
