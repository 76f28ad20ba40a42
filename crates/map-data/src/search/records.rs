//! Flattening the assembled data into search records.

use std::collections::BTreeMap;

use crate::error::{MapDataError, Result};
use crate::identifiers::*;
use crate::models::config::Config;
use crate::models::feature::{Feature, FeatureCollection, StationLabel};
use crate::models::metadata::EnrichedMetadata;
use crate::pipeline::assemble::Assembly;
use crate::pipeline::dedup::dedupe;
use crate::search::{BoundsRecord, SearchSeed, StationRecord};

/// One record per distinct station label, last occurrence winning.
pub fn build_station_records(collection: &FeatureCollection, config: &Config) -> Result<Vec<StationRecord>> {
    dedupe(collection.station_labels())
        .into_iter()
        .filter_map(|feature| feature.station_label().map(|label| station_record(feature, label, config)))
        .collect()
}

fn station_record(feature: &Feature, label: &StationLabel, config: &Config) -> Result<StationRecord> {
    let context = format!("station '{}'", label.name);
    let derived = &feature.properties.derived;

    let description = describe(config, derived.agency.as_ref(), derived.region.as_ref(), &context)?;
    let (lng, lat) = feature.point().ok_or_else(|| MapDataError::InvalidGeometry {
        name: label.name.clone(),
        expected: "Point",
    })?;
    let parent = derived
        .parent
        .clone()
        .ok_or_else(|| MapDataError::missing("line", "(none)", &context))?;

    Ok(StationRecord {
        name: label.name.clone(),
        description,
        lines: label.sorted_lines(),
        lng,
        lat,
        parent,
    })
}

/// One record per line/yard, in metadata map order.
pub fn build_bounds_records(
    metadata: &BTreeMap<LineId, EnrichedMetadata>,
    config: &Config,
) -> Result<Vec<BoundsRecord>> {
    metadata
        .values()
        .map(|enriched| {
            let line = &enriched.metadata;
            let context = format!("line '{}'", line.id);
            Ok(BoundsRecord {
                name: line.name.clone(),
                description: describe(config, Some(&enriched.agency), Some(&enriched.region), &context)?,
                terms: line
                    .search_terms
                    .as_ref()
                    .map(|terms| terms.join(","))
                    .unwrap_or_default(),
                id: line.id.clone(),
                line_type: line.line_type,
                bounds: enriched.bbox.to_json_string(),
            })
        })
        .collect()
}

pub fn build_search_seed(assembly: &Assembly, config: &Config) -> Result<SearchSeed> {
    let seed = SearchSeed {
        stations: build_station_records(&assembly.collection, config)?,
        bounds: build_bounds_records(&assembly.metadata, config)?,
    };
    log::info!(
        "Built {} station and {} bounds search records",
        seed.stations.len(),
        seed.bounds.len()
    );
    Ok(seed)
}

/// "<agency name> — <region title>", failing if either id does not resolve.
fn describe(
    config: &Config,
    agency: Option<&AgencyId>,
    region: Option<&RegionId>,
    context: &str,
) -> Result<String> {
    let agency = agency.ok_or_else(|| MapDataError::missing("agency", "(none)", context))?;
    let region = region.ok_or_else(|| MapDataError::missing("region", "(none)", context))?;

    let agency = config.require_agency(agency.as_str(), context)?;
    let region = config.require_region(region.as_str(), context)?;

    Ok(format!("{} — {}", agency.name, region.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::feature::FeatureKind;
    use crate::models::metadata::{LineMetadata, LineType};
    use crate::spatial::bbox::BBox;
    use geojson::Value;
    use serde_json::json;

    fn config() -> Config {
        Config::from_value(json!({
            "agencies": [
                { "id": "oc-transpo", "name": "OC Transpo", "bbox": [-76.0, 45.2, -75.4, 45.6], "data": [] }
            ],
            "regions": [
                { "id": "ottawa", "title": "Ottawa", "location": [-75.7, 45.4], "bbox": [-76.1, 45.1, -75.3, 45.7], "tier": 1, "agencies": ["oc-transpo"] }
            ]
        }))
        .unwrap()
    }

    fn station(name: &str, lines: &[&str], geometry: Value, parent: &str, agency: &str) -> Feature {
        let mut feature = Feature::new(
            geometry,
            FeatureKind::StationLabel(StationLabel {
                name: name.into(),
                lines: lines.iter().map(|l| l.to_string()).collect(),
                url: None,
            }),
        );
        let derived = &mut feature.properties.derived;
        derived.agency = Some(AgencyId::new(agency));
        derived.region = Some(RegionId::new("ottawa"));
        derived.parent = Some(LineId::new(parent));
        feature
    }

    fn point(lng: f64, lat: f64) -> Value {
        Value::Point(vec![lng, lat])
    }

    #[test]
    fn test_station_records() {
        let collection = FeatureCollection::new(vec![
            Feature::new(
                Value::LineString(vec![vec![-75.72, 45.40], vec![-75.70, 45.41]]),
                FeatureKind::Tracks,
            ),
            station("Bayview", &["2", "1"], point(-75.72, 45.40), "oc-1", "oc-transpo"),
            station("Bayview", &["1", "2"], point(-75.7215, 45.4005), "oc-2", "oc-transpo"),
            station("Pimisi", &["1"], point(-75.71, 45.41), "oc-1", "oc-transpo"),
        ]);

        let records = build_station_records(&collection, &config()).unwrap();

        assert_eq!(
            records,
            vec![
                StationRecord {
                    name: "Bayview".into(),
                    description: "OC Transpo — Ottawa".into(),
                    lines: vec!["1".into(), "2".into()],
                    lng: -75.7215,
                    lat: 45.4005,
                    parent: LineId::new("oc-2"),
                },
                StationRecord {
                    name: "Pimisi".into(),
                    description: "OC Transpo — Ottawa".into(),
                    lines: vec!["1".into()],
                    lng: -75.71,
                    lat: 45.41,
                    parent: LineId::new("oc-1"),
                },
            ]
        );
    }

    #[test]
    fn test_unknown_agency_is_an_error() {
        let collection = FeatureCollection::new(vec![station("Bayview", &["1"], point(-75.72, 45.40), "oc-1", "stm")]);

        let err = build_station_records(&collection, &config()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown agency 'stm' referenced by station 'Bayview'");
    }

    #[test]
    fn test_unenriched_station_is_an_error() {
        let mut feature = station("Bayview", &["1"], point(-75.72, 45.40), "oc-1", "oc-transpo");
        feature.properties.derived.region = None;

        let err = build_station_records(&FeatureCollection::new(vec![feature]), &config()).unwrap_err();
        assert!(matches!(err, MapDataError::MissingReference { kind: "region", .. }));
    }

    #[test]
    fn test_station_must_be_a_point() {
        let geometry = Value::LineString(vec![vec![-75.72, 45.40], vec![-75.71, 45.40]]);
        let collection = FeatureCollection::new(vec![station("Bayview", &["1"], geometry, "oc-1", "oc-transpo")]);

        let err = build_station_records(&collection, &config()).unwrap_err();
        assert!(matches!(err, MapDataError::InvalidGeometry { expected: "Point", .. }));
    }

    #[test]
    fn test_bounds_records() {
        let line = |id: &str, terms: Option<Vec<String>>| EnrichedMetadata {
            metadata: LineMetadata {
                id: LineId::new(id),
                name: format!("Line {id}"),
                line_type: LineType::RailLine,
                color: "#000000".into(),
                filter_key: None,
                offset: None,
                icon: None,
                search_terms: terms,
            },
            agency: AgencyId::new("oc-transpo"),
            region: RegionId::new("ottawa"),
            bbox: BBox::new(-75.9, 45.3, -75.5, 45.5),
        };

        let mut metadata = BTreeMap::new();
        metadata.insert(LineId::new("oc-2"), line("oc-2", None));
        metadata.insert(
            LineId::new("oc-1"),
            line("oc-1", Some(vec!["Confederation".into(), "O-Train".into()])),
        );

        let records = build_bounds_records(&metadata, &config()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "oc-1");
        assert_eq!(records[0].terms, "Confederation,O-Train");
        assert_eq!(records[0].description, "OC Transpo — Ottawa");
        assert_eq!(records[0].bounds, "[-75.9,45.3,-75.5,45.5]");
        assert_eq!(records[1].terms, "");
    }
}
