//! Forecast region registry.
//!
//! Regions are loaded once from a boundary FeatureCollection and indexed
//! by display name. Lookups go through the index; nothing walks the
//! rendering surface to find a region.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::geojson::FeatureCollection;

/// Feature property carrying the region's display name.
pub const NAME_PROPERTY: &str = "name";

/// A named forecast region. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// Raw GeoJSON geometry, owned by the rendering side.
    pub geometry: Value,
}

impl Region {
    pub fn new(name: impl Into<String>, geometry: Value) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}

/// What to do when two boundary features share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep every feature, but name lookups bind the first one loaded.
    #[default]
    FirstMatchWins,
    /// Fail the load.
    Reject,
}

/// Regions keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
    skipped: usize,
}

impl RegionRegistry {
    /// Build a registry from regions in load order.
    pub fn new(regions: Vec<Region>, policy: DuplicatePolicy) -> AdvisoryResult<Self> {
        let mut index = HashMap::with_capacity(regions.len());
        let mut duplicates = Vec::new();

        for (i, region) in regions.iter().enumerate() {
            if index.contains_key(&region.name) {
                if policy == DuplicatePolicy::Reject {
                    return Err(AdvisoryError::DuplicateRegion(region.name.clone()));
                }
                duplicates.push(region.name.clone());
                continue;
            }
            index.insert(region.name.clone(), i);
        }

        Ok(Self {
            regions,
            index,
            duplicates,
            skipped: 0,
        })
    }

    /// Build a registry from a boundary FeatureCollection.
    ///
    /// Features without a string `name` property can't be matched and are
    /// skipped; see [`RegionRegistry::skipped`].
    pub fn from_feature_collection(
        collection: FeatureCollection,
        policy: DuplicatePolicy,
    ) -> AdvisoryResult<Self> {
        let mut skipped = 0;
        let regions: Vec<Region> = collection
            .features
            .into_iter()
            .filter_map(|mut feature| match feature.properties.remove(NAME_PROPERTY) {
                Some(Value::String(name)) => Some(Region::new(name, feature.geometry)),
                _ => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        let mut registry = Self::new(regions, policy)?;
        registry.skipped = skipped;
        Ok(registry)
    }

    /// Parse a boundary GeoJSON string.
    pub fn from_geojson_str(json: &str, policy: DuplicatePolicy) -> AdvisoryResult<Self> {
        let collection = FeatureCollection::from_json(json)
            .map_err(|e| AdvisoryError::RegionSource(e.to_string()))?;
        if collection.type_ != "FeatureCollection" {
            return Err(AdvisoryError::RegionSource(format!(
                "expected FeatureCollection, got {}",
                collection.type_
            )));
        }
        Self::from_feature_collection(collection, policy)
    }

    /// Load a boundary GeoJSON file.
    pub fn from_file(path: impl AsRef<Path>, policy: DuplicatePolicy) -> AdvisoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AdvisoryError::RegionSource(format!("{}: {}", path.display(), e))
        })?;
        Self::from_geojson_str(&content, policy)
    }

    /// Exact, case-sensitive lookup. First loaded entry wins among duplicates.
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&i| &self.regions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All regions in load order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Names that appeared more than once (one entry per extra occurrence).
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Number of features dropped for lacking a name.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
