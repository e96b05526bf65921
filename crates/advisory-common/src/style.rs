//! Visual treatments applied to forecast regions.
//!
//! A treatment is the full set of path-style parameters the map client
//! needs for one region. The three treatments (warning, watch, neutral)
//! live in a [`TreatmentTable`] that can be overridden from YAML config.

use serde::{Deserialize, Serialize};

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA", or a CSS color name
    Css(String),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn named(name: &str) -> Self {
        Color::Css(name.to_string())
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Css(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Css(name) => named_color(name),
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }

    /// CSS string for the map client.
    pub fn to_css(&self) -> String {
        match self {
            Color::Css(s) => s.clone(),
            Color::Rgba { r, g, b, a } => {
                format!("rgba({}, {}, {}, {:.3})", r, g, b, *a as f64 / 255.0)
            }
        }
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2).unwrap_or("00"), 16).unwrap_or(0);

    match s.len() {
        6 => (channel(0), channel(2), channel(4), 255),
        8 => (channel(0), channel(2), channel(4), channel(6)),
        _ => (0, 0, 0, 255),
    }
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}

/// Path style for one region: stroke plus fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualTreatment {
    /// Fill color keyed to severity
    pub fill_color: Color,

    /// Stroke color
    #[serde(default = "default_stroke")]
    pub color: Color,

    /// Stroke weight in pixels
    pub weight: f32,

    /// Stroke opacity (0..=1)
    pub opacity: f32,

    /// Fill opacity (0..=1)
    pub fill_opacity: f32,
}

fn default_stroke() -> Color {
    Color::named("black")
}

impl VisualTreatment {
    /// High-alert treatment: strong color, heavy stroke, full opacity.
    pub fn warning() -> Self {
        Self {
            fill_color: Color::named("red"),
            color: default_stroke(),
            weight: 4.0,
            opacity: 1.0,
            fill_opacity: 0.7,
        }
    }

    /// Moderate treatment: caution color, medium stroke.
    pub fn watch() -> Self {
        Self {
            fill_color: Color::named("yellow"),
            color: default_stroke(),
            weight: 2.0,
            opacity: 0.9,
            fill_opacity: 0.6,
        }
    }

    /// Neutral treatment: muted color, thin stroke.
    pub fn neutral() -> Self {
        Self {
            fill_color: Color::named("gray"),
            color: default_stroke(),
            weight: 1.0,
            opacity: 0.6,
            fill_opacity: 0.3,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!("weight must be a non-negative number, got {}", self.weight));
        }
        for (field, value) in [("opacity", self.opacity), ("fillOpacity", self.fill_opacity)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within 0..=1, got {}", field, value));
            }
        }
        Ok(())
    }
}

/// The three severity treatments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentTable {
    #[serde(default = "VisualTreatment::warning")]
    pub warning: VisualTreatment,

    #[serde(default = "VisualTreatment::watch")]
    pub watch: VisualTreatment,

    /// Used for unknown grades and as the cleared state.
    #[serde(default = "VisualTreatment::neutral")]
    pub default: VisualTreatment,
}

impl Default for TreatmentTable {
    fn default() -> Self {
        Self {
            warning: VisualTreatment::warning(),
            watch: VisualTreatment::watch(),
            default: VisualTreatment::neutral(),
        }
    }
}

impl TreatmentTable {
    /// Validate every treatment in the table.
    pub fn validate(&self) -> Result<(), String> {
        for (name, treatment) in [
            ("warning", &self.warning),
            ("watch", &self.watch),
            ("default", &self.default),
        ] {
            treatment
                .validate()
                .map_err(|e| format!("{}: {}", name, e))?;
        }
        Ok(())
    }
}
