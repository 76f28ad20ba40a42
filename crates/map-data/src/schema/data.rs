//! Schema for per-line GeoJSON files.

use std::sync::OnceLock;

use super::{optional, required, Schema};

pub const FEATURE_TYPES: &[&str] = &[
    "tracks",
    "tunnel",
    "overpass",
    "station-platforms",
    "station-label",
];

pub const LINE_TYPES: &[&str] = &["rail-line", "rail-yard"];

/// `[lng, lat]` or `[lng, lat, elevation]`
pub fn position() -> Schema {
    Schema::array_of_len(Schema::number(), 2, Some(3))
}

/// `[minLng, minLat, maxLng, maxLat]`
pub fn bbox() -> Schema {
    Schema::array_of_len(Schema::number(), 4, Some(4))
}

fn geometry() -> Schema {
    let line = || Schema::array_of_len(position(), 2, None);
    let ring = || Schema::array_of_len(position(), 4, None);
    let polygon = move || Schema::array_of_len(ring(), 1, None);

    Schema::tagged(
        "type",
        vec![
            ("Point", vec![required("coordinates", position())]),
            ("LineString", vec![required("coordinates", line())]),
            ("MultiLineString", vec![required("coordinates", Schema::array_of_len(line(), 1, None))]),
            ("Polygon", vec![required("coordinates", polygon())]),
            ("MultiPolygon", vec![required("coordinates", Schema::array_of_len(polygon(), 1, None))]),
        ],
    )
}

fn properties() -> Schema {
    let variants = FEATURE_TYPES
        .iter()
        .map(|&kind| {
            let properties = if kind == "station-label" {
                vec![
                    required("name", Schema::non_empty_string()),
                    required("lines", Schema::array_of_len(Schema::non_empty_string(), 1, None)),
                    optional("url", Schema::string()),
                ]
            } else {
                vec![]
            };
            (kind, properties)
        })
        .collect();

    Schema::tagged("type", variants)
}

fn metadata() -> Schema {
    Schema::object(vec![
        required("id", Schema::non_empty_string()),
        required("name", Schema::non_empty_string()),
        required("type", Schema::Enum(LINE_TYPES)),
        required("color", Schema::non_empty_string()),
        optional("filterKey", Schema::string()),
        optional("offset", Schema::number()),
        optional("icon", Schema::string()),
        optional("searchTerms", Schema::array(Schema::string())),
    ])
}

fn feature() -> Schema {
    Schema::object(vec![
        required("type", Schema::Const("Feature")),
        required("geometry", geometry()),
        required("properties", properties()),
        optional("id", Schema::Any),
        optional("bbox", bbox()),
    ])
}

fn build() -> Schema {
    Schema::open_object(vec![
        required("type", Schema::Const("FeatureCollection")),
        required("metadata", metadata()),
        optional("bbox", bbox()),
        required("features", Schema::array_of_len(feature(), 1, None)),
    ])
}

/// The schema every line/yard file must satisfy.
pub fn data_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, SchemaError};
    use serde_json::json;

    fn line() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "metadata": { "id": "oc-1", "name": "Confederation Line", "type": "rail-line", "color": "#da291c" },
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": [[-75.72, 45.40], [-75.69, 45.42]] },
                    "properties": { "type": "tracks" }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-75.72, 45.40] },
                    "properties": { "type": "station-label", "name": "Bayview", "lines": ["1", "2"] }
                }
            ]
        })
    }

    #[test]
    fn test_valid_line_file() {
        let report = validate(&line(), data_schema());
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_station_label_requires_lines() {
        let mut doc = line();
        doc["features"][1]["properties"] = json!({ "type": "station-label", "name": "Bayview" });

        let report = validate(&doc, data_schema());
        assert_eq!(report.errors, vec![SchemaError::new("/features/1/properties/lines", "is required")]);
    }

    #[test]
    fn test_derived_properties_are_rejected_in_source() {
        let mut doc = line();
        doc["features"][0]["properties"]["region"] = json!("ottawa");

        let report = validate(&doc, data_schema());
        assert_eq!(
            report.errors,
            vec![SchemaError::new("/features/0/properties/region", "is not an allowed property")]
        );
    }

    #[test]
    fn test_geometry_constraints() {
        let mut doc = line();
        doc["features"][0]["geometry"] = json!({ "type": "LineString", "coordinates": [[-75.72, 45.40]] });
        doc["features"][1]["geometry"] = json!({ "type": "GeometryCollection", "geometries": [] });
        doc["metadata"]["type"] = json!("bus-route");

        let report = validate(&doc, data_schema());
        assert_eq!(
            report.errors,
            vec![
                SchemaError::new("/metadata/type", "must be one of: rail-line, rail-yard"),
                SchemaError::new("/features/0/geometry/coordinates", "must contain at least 2 items"),
                SchemaError::new(
                    "/features/1/geometry/type",
                    "must be one of: Point, LineString, MultiLineString, Polygon, MultiPolygon"
                ),
            ]
        );
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        let mut doc = line();
        doc["features"] = json!([]);

        let report = validate(&doc, data_schema());
        assert_eq!(report.errors, vec![SchemaError::new("/features", "must contain at least 1 items")]);
    }
}
