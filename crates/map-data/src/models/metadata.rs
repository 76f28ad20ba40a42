//! Line/yard metadata, as authored and after enrichment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identifiers::*;
use crate::spatial::bbox::BBox;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineType {
    RailLine,
    RailYard,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RailLine => "rail-line",
            Self::RailYard => "rail-yard",
        }
    }
}

impl FromStr for LineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rail-line" => Ok(Self::RailLine),
            "rail-yard" => Ok(Self::RailYard),
            other => Err(format!("unknown line type '{other}'")),
        }
    }
}

/// The `metadata` block carried by every line/yard file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMetadata {
    pub id: LineId,
    pub name: String,
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<Vec<String>>,
}

/// Metadata with its owning agency, region and computed extent attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    #[serde(flatten)]
    pub metadata: LineMetadata,
    pub agency: AgencyId,
    pub region: RegionId,
    pub bbox: BBox,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enriched_metadata_is_flat() {
        let enriched = EnrichedMetadata {
            metadata: LineMetadata {
                id: LineId::new("oc-1"),
                name: "Confederation Line".into(),
                line_type: LineType::RailLine,
                color: "#da291c".into(),
                filter_key: Some("lrt".into()),
                offset: None,
                icon: None,
                search_terms: Some(vec!["O-Train".into()]),
            },
            agency: AgencyId::new("oc-transpo"),
            region: RegionId::new("ottawa"),
            bbox: BBox::new(-75.9, 45.3, -75.5, 45.5),
        };

        assert_eq!(
            serde_json::to_value(&enriched).unwrap(),
            json!({
                "id": "oc-1",
                "name": "Confederation Line",
                "type": "rail-line",
                "color": "#da291c",
                "filterKey": "lrt",
                "searchTerms": ["O-Train"],
                "agency": "oc-transpo",
                "region": "ottawa",
                "bbox": [-75.9, 45.3, -75.5, 45.5]
            })
        );
    }
}
