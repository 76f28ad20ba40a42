//! A single line/yard source file.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::feature::{CollectionTag, Feature};
use crate::models::metadata::LineMetadata;
use crate::schema::{data_schema, decode};
use crate::spatial::bbox::BBox;

/// One GeoJSON FeatureCollection per line or yard, with its metadata block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineDataset {
    #[serde(rename = "type")]
    pub tag: CollectionTag,
    pub metadata: LineMetadata,
    /// Declared extent, if the author recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
    pub features: Vec<Feature>,
}

impl LineDataset {
    /// Validate `document` against the data schema and decode it.
    ///
    /// `name` identifies the file in error messages.
    pub fn from_value(document: Value, name: &str) -> Result<Self> {
        decode(document, data_schema(), name)
    }
}
