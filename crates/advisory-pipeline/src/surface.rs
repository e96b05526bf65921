//! Rendering surface abstraction and the in-memory overlay.

use std::collections::HashMap;

use advisory_common::{
    Coordinate, Feature, FeatureCollection, Region, RegionRegistry, VisualTreatment,
};
use serde::Serialize;

/// The map-side operations the pipeline drives.
///
/// Implementations own region geometry and label placement; the pipeline
/// never inspects their internals.
pub trait RenderSurface: Send {
    fn apply_style(&mut self, region: &Region, treatment: &VisualTreatment);

    fn bind_popup(&mut self, region: &Region, html: &str);

    fn place_label(&mut self, coordinate: Coordinate, text: &str);

    /// Reset every region to the default treatment, drop popups and labels.
    fn clear_overlays(&mut self);
}

/// A label as held by the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub coordinate: Coordinate,
    pub text: String,
}

/// In-memory surface that renders to a GeoJSON FeatureCollection.
#[derive(Debug, Clone)]
pub struct OverlaySurface {
    regions: Vec<Region>,
    base: VisualTreatment,
    styles: HashMap<String, VisualTreatment>,
    popups: HashMap<String, String>,
    labels: Vec<PlacedLabel>,
}

impl OverlaySurface {
    /// One overlay feature per unique registry region, in load order.
    pub fn new(registry: &RegionRegistry, base: VisualTreatment) -> Self {
        let regions = registry
            .iter()
            .filter(|r| {
                registry
                    .get(&r.name)
                    .map_or(false, |bound| std::ptr::eq(bound, *r))
            })
            .cloned()
            .collect();

        Self {
            regions,
            base,
            styles: HashMap::new(),
            popups: HashMap::new(),
            labels: Vec::new(),
        }
    }

    /// Current treatment of a region (the base treatment if unstyled).
    pub fn treatment_of(&self, name: &str) -> &VisualTreatment {
        self.styles.get(name).unwrap_or(&self.base)
    }

    pub fn is_styled(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn styled_count(&self) -> usize {
        self.styles.len()
    }

    pub fn popup_of(&self, name: &str) -> Option<&str> {
        self.popups.get(name).map(String::as_str)
    }

    pub fn labels(&self) -> &[PlacedLabel] {
        &self.labels
    }

    /// Render regions (with style and popup properties) followed by label points.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut collection = FeatureCollection::new();

        for region in &self.regions {
            let style = serde_json::to_value(self.treatment_of(&region.name))
                .unwrap_or(serde_json::Value::Null);
            let mut feature = Feature::new(region.geometry.clone())
                .with_property("kind", "region")
                .with_property("name", region.name.clone())
                .with_property("styled", self.is_styled(&region.name))
                .with_property("style", style);
            if let Some(popup) = self.popup_of(&region.name) {
                feature = feature.with_property("popup", popup);
            }
            collection = collection.with_feature(feature);
        }

        for label in &self.labels {
            collection = collection.with_feature(
                Feature::point(label.coordinate.lon, label.coordinate.lat)
                    .with_property("kind", "label")
                    .with_property("text", label.text.clone()),
            );
        }

        collection
    }
}

impl RenderSurface for OverlaySurface {
    fn apply_style(&mut self, region: &Region, treatment: &VisualTreatment) {
        self.styles.insert(region.name.clone(), treatment.clone());
    }

    fn bind_popup(&mut self, region: &Region, html: &str) {
        self.popups.insert(region.name.clone(), html.to_string());
    }

    fn place_label(&mut self, coordinate: Coordinate, text: &str) {
        self.labels.push(PlacedLabel {
            coordinate,
            text: text.to_string(),
        });
    }

    fn clear_overlays(&mut self) {
        self.styles.clear();
        self.popups.clear();
        self.labels.clear();
    }
}
