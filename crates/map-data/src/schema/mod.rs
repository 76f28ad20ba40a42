//! Structural validation of JSON documents.
//!
//! Schemas are small declarative trees interpreted by a single walker. Every
//! violation is reported with the JSON pointer of the offending value, so the
//! whole list can be handed back to whoever is authoring the file.

pub mod config;
pub mod data;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{MapDataError, Result};

pub use config::config_schema;
pub use data::data_schema;

// ============================================================================
// Reports
// ============================================================================

/// A single violation: where it happened and what is wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaError {
    /// JSON pointer to the offending value ("" is the document root)
    pub path: String,
    pub message: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<SchemaError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the report into a `SchemaValidation` error naming `document`.
    pub fn into_result(self, document: impl Into<String>) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MapDataError::SchemaValidation {
                document: document.into(),
                errors: self.errors,
            })
        }
    }
}

// ============================================================================
// Schema tree
// ============================================================================

#[derive(Clone, Debug)]
pub enum Schema {
    Any,
    String { min_len: usize },
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64>, max: Option<i64> },
    Enum(&'static [&'static str]),
    Const(&'static str),
    Array {
        items: Box<Schema>,
        min_items: usize,
        max_items: Option<usize>,
    },
    Object {
        properties: Vec<Property>,
        additional: bool,
    },
    /// An object whose `tag` property selects the schema for the rest of it.
    Tagged {
        tag: &'static str,
        variants: Vec<(&'static str, Schema)>,
    },
}

#[derive(Clone, Debug)]
pub struct Property {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

pub fn required(name: &'static str, schema: Schema) -> Property {
    Property { name, schema, required: true }
}

pub fn optional(name: &'static str, schema: Schema) -> Property {
    Property { name, schema, required: false }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String { min_len: 0 }
    }

    pub fn non_empty_string() -> Self {
        Schema::String { min_len: 1 }
    }

    pub fn number() -> Self {
        Schema::Number { min: None, max: None }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_items: 0,
            max_items: None,
        }
    }

    /// Array with an inclusive item count range.
    pub fn array_of_len(items: Schema, min_items: usize, max_items: Option<usize>) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_items,
            max_items,
        }
    }

    /// Closed object: properties not listed are rejected.
    pub fn object(properties: Vec<Property>) -> Self {
        Schema::Object { properties, additional: false }
    }

    /// Open object: unlisted properties are allowed and ignored.
    pub fn open_object(properties: Vec<Property>) -> Self {
        Schema::Object { properties, additional: true }
    }

    /// Discriminated union; each variant is a closed object that implicitly
    /// accepts the tag property itself.
    pub fn tagged(tag: &'static str, variants: Vec<(&'static str, Vec<Property>)>) -> Self {
        Schema::Tagged {
            tag,
            variants: variants
                .into_iter()
                .map(|(name, mut properties)| {
                    properties.insert(0, required(tag, Schema::Const(name)));
                    (name, Schema::object(properties))
                })
                .collect(),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate `document` against `schema`, collecting every violation.
pub fn validate(document: &Value, schema: &Schema) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut path = String::new();
    walk(document, schema, &mut path, &mut report.errors);
    report
}

/// Validate, then deserialize into the typed model.
///
/// A deserialization failure after a clean validation is still reported as a
/// schema violation at the root, since it means the document is not usable.
pub fn decode<T: DeserializeOwned>(document: Value, schema: &Schema, name: &str) -> Result<T> {
    validate(&document, schema).into_result(name)?;
    serde_json::from_value(document).map_err(|e| MapDataError::SchemaValidation {
        document: name.to_string(),
        errors: vec![SchemaError::new("", e.to_string())],
    })
}

fn walk(value: &Value, schema: &Schema, path: &mut String, errors: &mut Vec<SchemaError>) {
    match schema {
        Schema::Any => {}
        Schema::String { min_len } => match value.as_str() {
            Some(s) if s.chars().count() < *min_len => {
                errors.push(SchemaError::new(path.clone(), "must not be empty"));
            }
            Some(_) => {}
            None => type_mismatch(value, "string", path, errors),
        },
        Schema::Number { min, max } => match value.as_f64() {
            Some(n) => check_range(n, *min, *max, path, errors),
            None => type_mismatch(value, "number", path, errors),
        },
        Schema::Integer { min, max } => match value.as_i64() {
            Some(n) => check_range(n, *min, *max, path, errors),
            None => type_mismatch(value, "integer", path, errors),
        },
        Schema::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.iter().any(|a| *a == s) => {}
            _ => errors.push(SchemaError::new(
                path.clone(),
                format!("must be one of: {}", allowed.join(", ")),
            )),
        },
        Schema::Const(expected) => {
            if value.as_str() != Some(*expected) {
                errors.push(SchemaError::new(path.clone(), format!("must be \"{expected}\"")));
            }
        }
        Schema::Array { items, min_items, max_items } => {
            let Some(array) = value.as_array() else {
                return type_mismatch(value, "array", path, errors);
            };
            if array.len() < *min_items {
                errors.push(SchemaError::new(
                    path.clone(),
                    format!("must contain at least {min_items} items"),
                ));
            }
            if let Some(max) = max_items {
                if array.len() > *max {
                    errors.push(SchemaError::new(
                        path.clone(),
                        format!("must contain at most {max} items"),
                    ));
                }
            }
            for (i, item) in array.iter().enumerate() {
                with_segment(path, &i.to_string(), |path| walk(item, items, path, errors));
            }
        }
        Schema::Object { properties, additional } => {
            let Some(object) = value.as_object() else {
                return type_mismatch(value, "object", path, errors);
            };
            for property in properties {
                match object.get(property.name) {
                    Some(child) => with_segment(path, property.name, |path| {
                        walk(child, &property.schema, path, errors)
                    }),
                    None if property.required => with_segment(path, property.name, |path| {
                        errors.push(SchemaError::new(path.clone(), "is required"))
                    }),
                    None => {}
                }
            }
            if !additional {
                for key in object.keys() {
                    if !properties.iter().any(|p| p.name == key.as_str()) {
                        with_segment(path, key, |path| {
                            errors.push(SchemaError::new(path.clone(), "is not an allowed property"))
                        });
                    }
                }
            }
        }
        Schema::Tagged { tag, variants } => {
            let Some(object) = value.as_object() else {
                return type_mismatch(value, "object", path, errors);
            };
            let variant = object
                .get(*tag)
                .and_then(Value::as_str)
                .and_then(|name| variants.iter().find(|(n, _)| *n == name));
            match variant {
                Some((_, schema)) => walk(value, schema, path, errors),
                None => {
                    let names: Vec<&str> = variants.iter().map(|(n, _)| *n).collect();
                    with_segment(path, tag, |path| {
                        errors.push(SchemaError::new(
                            path.clone(),
                            format!("must be one of: {}", names.join(", ")),
                        ))
                    });
                }
            }
        }
    }
}

fn check_range<N: PartialOrd + fmt::Display>(
    n: N,
    min: Option<N>,
    max: Option<N>,
    path: &str,
    errors: &mut Vec<SchemaError>,
) {
    if let Some(min) = min {
        if n < min {
            errors.push(SchemaError::new(path, format!("must be >= {min}")));
        }
    }
    if let Some(max) = max {
        if n > max {
            errors.push(SchemaError::new(path, format!("must be <= {max}")));
        }
    }
}

fn type_mismatch(value: &Value, expected: &str, path: &str, errors: &mut Vec<SchemaError>) {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    errors.push(SchemaError::new(path, format!("expected {expected}, found {found}")));
}

/// Run `f` with `segment` appended to the JSON pointer `path`.
fn with_segment(path: &mut String, segment: &str, f: impl FnOnce(&mut String)) {
    let len = path.len();
    path.push('/');
    path.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    f(path);
    path.truncate(len);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn station_schema() -> Schema {
        Schema::object(vec![
            required("name", Schema::non_empty_string()),
            required("lines", Schema::array_of_len(Schema::string(), 1, None)),
            optional("tier", Schema::Integer { min: Some(1), max: Some(3) }),
        ])
    }

    #[test]
    fn test_valid_document() {
        let report = validate(&json!({ "name": "Bayview", "lines": ["1"] }), &station_schema());
        assert!(report.is_valid());
    }

    #[test]
    fn test_collects_every_error_with_paths() {
        let doc = json!({ "name": "", "lines": [1, "2"], "tier": 4, "colour": "red" });
        let report = validate(&doc, &station_schema());

        assert_eq!(
            report.errors,
            vec![
                SchemaError::new("/name", "must not be empty"),
                SchemaError::new("/lines/0", "expected string, found number"),
                SchemaError::new("/tier", "must be <= 3"),
                SchemaError::new("/colour", "is not an allowed property"),
            ]
        );
    }

    #[test]
    fn test_missing_required_property() {
        let report = validate(&json!({ "name": "Bayview" }), &station_schema());
        assert_eq!(report.errors, vec![SchemaError::new("/lines", "is required")]);
    }

    #[test]
    fn test_tagged_union() {
        let schema = Schema::tagged(
            "type",
            vec![
                ("Point", vec![required("coordinates", Schema::array(Schema::number()))]),
                ("LineString", vec![required("coordinates", Schema::array(Schema::Any))]),
            ],
        );

        assert!(validate(&json!({ "type": "Point", "coordinates": [1.0, 2.0] }), &schema).is_valid());

        let report = validate(&json!({ "type": "Circle" }), &schema);
        assert_eq!(
            report.errors,
            vec![SchemaError::new("/type", "must be one of: Point, LineString")]
        );
    }

    #[test]
    fn test_pointer_escaping() {
        let schema = Schema::object(vec![]);
        let report = validate(&json!({ "a/b~c": 1 }), &schema);
        assert_eq!(report.errors[0].path, "/a~1b~0c");
    }

    #[test]
    fn test_into_result() {
        let report = validate(&json!("nope"), &station_schema());
        let err = report.into_result("config.json").unwrap_err();
        match err {
            MapDataError::SchemaValidation { document, errors } => {
                assert_eq!(document, "config.json");
                assert_eq!(errors[0].to_string(), "(root): expected object, found string");
            }
            other => panic!("Expected schema error, got {other:?}"),
        }
    }
}
