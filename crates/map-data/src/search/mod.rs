//! Search corpus: flattened records and the embedded full-text index.

pub mod index;
pub mod records;

use serde::{Deserialize, Serialize};

use crate::identifiers::LineId;
use crate::models::metadata::LineType;

/// A station as indexed for search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    /// "<agency name> — <region title>"
    pub description: String,
    /// Sorted line names
    pub lines: Vec<String>,
    pub lng: f64,
    pub lat: f64,
    pub parent: LineId,
}

/// A line or yard as indexed for search, for zooming to its extent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord {
    pub name: String,
    pub description: String,
    /// Comma-joined search terms, empty when the line has none
    pub terms: String,
    pub id: LineId,
    #[serde(rename = "type")]
    pub line_type: LineType,
    /// JSON-encoded `[minLng, minLat, maxLng, maxLat]`
    pub bounds: String,
}

/// Everything the search index is seeded with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSeed {
    pub stations: Vec<StationRecord>,
    pub bounds: Vec<BoundsRecord>,
}
