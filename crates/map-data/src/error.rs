//! Error type shared by every stage of the pipeline.

use std::fmt;
use std::path::PathBuf;

use crate::identifiers::LineId;
use crate::schema::SchemaError;

#[derive(Debug, thiserror::Error)]
pub enum MapDataError {
    #[error("{document} failed schema validation:\n{}", SchemaErrors(.errors))]
    SchemaValidation {
        document: String,
        errors: Vec<SchemaError>,
    },

    #[error("Unknown {kind} '{id}' referenced by {context}")]
    MissingReference {
        kind: &'static str,
        id: String,
        context: String,
    },

    #[error("Station '{name}' must have a {expected} geometry")]
    InvalidGeometry { name: String, expected: &'static str },

    #[error("Dataset {0} has no features to compute a bounding box from")]
    EmptyDataset(LineId),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Search index error: {0}")]
    Search(#[from] rusqlite::Error),
}

impl MapDataError {
    pub(crate) fn missing(kind: &'static str, id: impl fmt::Display, context: impl fmt::Display) -> Self {
        Self::MissingReference {
            kind,
            id: id.to_string(),
            context: context.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapDataError>;

/// Renders one schema error per line for the error message.
struct SchemaErrors<'a>(&'a [SchemaError]);

impl fmt::Display for SchemaErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_are_listed_verbatim() {
        let err = MapDataError::SchemaValidation {
            document: "oc-transpo/line-1.json".into(),
            errors: vec![
                SchemaError::new("/metadata/color", "is required"),
                SchemaError::new("/features/0/geometry/type", "must be one of: Point, LineString"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "oc-transpo/line-1.json failed schema validation:\n  \
             /metadata/color: is required\n  \
             /features/0/geometry/type: must be one of: Point, LineString"
        );
    }

    #[test]
    fn test_missing_reference_message() {
        let err = MapDataError::missing("agency", "stm", "region 'montreal'");
        assert_eq!(err.to_string(), "Unknown agency 'stm' referenced by region 'montreal'");
    }
}
