//! GeoJSON features with typed properties.
//!
//! `properties.type` selects a [`FeatureKind`]; everything the pipeline stamps
//! on later lives in [`DerivedProperties`]. Both flatten into the same
//! `properties` object on the wire.

use geojson::{Geometry, Value as GeometryValue};
use serde::{Deserialize, Serialize};

use crate::identifiers::*;
use crate::models::metadata::LineType;
use crate::spatial::bbox::BBox;

// ============================================================================
// Tags
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FeatureKind {
    Tracks,
    Tunnel,
    Overpass,
    StationPlatforms,
    StationLabel(StationLabel),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationLabel {
    pub name: String,
    /// Line names served, as authored (not necessarily sorted)
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StationLabel {
    pub fn sorted_lines(&self) -> Vec<String> {
        let mut lines = self.lines.clone();
        lines.sort();
        lines
    }

    /// Identity of a station across files: name plus its order-independent line set.
    pub fn key(&self) -> (String, Vec<String>) {
        (self.name.clone(), self.sorted_lines())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<AgencyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
    /// Id of the line/yard dataset the feature came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<LineId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<LineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(flatten)]
    pub kind: FeatureKind,
    #[serde(flatten)]
    pub derived: DerivedProperties,
}

// ============================================================================
// Features
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub tag: FeatureTag,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

impl Feature {
    pub fn new(geometry: GeometryValue, kind: FeatureKind) -> Self {
        Self {
            tag: FeatureTag::Feature,
            geometry: Geometry::new(geometry),
            properties: FeatureProperties {
                kind,
                derived: DerivedProperties::default(),
            },
            id: None,
            bbox: None,
        }
    }

    pub fn station_label(&self) -> Option<&StationLabel> {
        match &self.properties.kind {
            FeatureKind::StationLabel(label) => Some(label),
            _ => None,
        }
    }

    /// `(lng, lat)` when the geometry is a Point
    pub fn point(&self) -> Option<(f64, f64)> {
        match &self.geometry.value {
            GeometryValue::Point(position) if position.len() >= 2 => Some((position[0], position[1])),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub tag: CollectionTag,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn station_labels(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.station_label().is_some())
    }
}
