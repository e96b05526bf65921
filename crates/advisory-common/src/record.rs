//! Advisory records as delivered by a data refresh.
//!
//! The wire shape follows the JMA tsunami forecast areas published by the
//! P2P earthquake feed (`code=552`): one entry per forecast region, with a
//! grade code and optional height / first-wave details. The offline fixture
//! uses the same shape, plus an optional `coordinates` field for labels.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Timestamp format used by the feed for `firstHeight.arrivalTime`.
pub const ARRIVAL_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Severity grade of an advisory.
///
/// Only `Warning` and `Watch` are recognized; every other code (including
/// the empty string) is carried verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    Warning,
    Watch,
    Other(String),
}

impl Grade {
    /// Parse a grade code. Never fails.
    pub fn from_code(code: &str) -> Self {
        match code {
            "Warning" => Grade::Warning,
            "Watch" => Grade::Watch,
            other => Grade::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Grade::Warning => "Warning",
            Grade::Watch => "Watch",
            Grade::Other(code) => code,
        }
    }
}

impl Default for Grade {
    fn default() -> Self {
        Grade::Other(String::new())
    }
}

impl From<String> for Grade {
    fn from(code: String) -> Self {
        Grade::from_code(&code)
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.as_str().to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Peak wave height measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxHeight {
    /// Height in meters. Missing on malformed or qualitative entries.
    #[serde(default, deserialize_with = "lenient_height")]
    pub value: Option<f64>,

    /// Human-readable description, e.g. "３ｍ" or "巨大".
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// Accept a number or a numeric string; anything else reads as no value.
fn lenient_height<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Read an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_grade<'de, D>(deserializer: D) -> Result<Grade, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?
        .map(Grade::from)
        .unwrap_or_default())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, bool>(deserializer)?.unwrap_or(false))
}

/// First-wave detail: either a condition or a scheduled arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FirstHeight {
    Condition {
        condition: String,
    },
    Arrival {
        #[serde(rename = "arrivalTime")]
        arrival_time: String,
    },
}

impl FirstHeight {
    /// Parsed arrival time, if this is an arrival entry in the feed's format.
    pub fn arrival_time(&self) -> Option<NaiveDateTime> {
        match self {
            FirstHeight::Arrival { arrival_time } => {
                NaiveDateTime::parse_from_str(arrival_time, ARRIVAL_TIME_FORMAT).ok()
            }
            FirstHeight::Condition { .. } => None,
        }
    }
}

/// Geographic coordinate, serialized as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

/// One forecast-region entry from a data refresh.
///
/// Only `name` is required. Any other field with an unexpected shape reads
/// as its default, so a bad field costs only what depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRecord {
    /// Forecast region name, matched against the region registry.
    pub name: String,

    #[serde(default, deserialize_with = "lenient_grade")]
    pub grade: Grade,

    /// Set by the feed when the first wave is imminent or already arriving.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub immediate: bool,

    #[serde(default, deserialize_with = "lenient")]
    pub max_height: Option<MaxHeight>,

    #[serde(default, deserialize_with = "lenient")]
    pub first_height: Option<FirstHeight>,

    /// Explicit label position. Never derived from region geometry.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinate>,
}

impl AdvisoryRecord {
    pub fn new(name: impl Into<String>, grade: Grade) -> Self {
        Self {
            name: name.into(),
            grade,
            immediate: false,
            max_height: None,
            first_height: None,
            coordinates: None,
        }
    }

    pub fn with_max_height(mut self, value: f64, description: impl Into<String>) -> Self {
        self.max_height = Some(MaxHeight {
            value: Some(value),
            description: Some(description.into()),
        });
        self
    }

    pub fn with_first_height(mut self, first_height: FirstHeight) -> Self {
        self.first_height = Some(first_height);
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.coordinates = Some(Coordinate::new(lat, lon));
        self
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Numeric peak height, if the record carries one.
    pub fn height_value(&self) -> Option<f64> {
        self.max_height.as_ref().and_then(|h| h.value)
    }
}
