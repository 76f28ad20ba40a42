//! # transit-map-data
//!
//! Build-time assembly of the transit map's geodata and search corpus.
//!
//! ## Features
//!
//! - **Schema validation**: every config and line file is checked before use
//! - **Enrichment**: region/agency/line properties stamped onto each feature
//! - **Assembly**: one merged feature collection plus a metadata map
//! - **Search**: station and bounds records indexed in embedded SQLite FTS5
//! - **Concurrent loading**: read line files in parallel (`async` feature)
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use transit_map_data::prelude::*;
//! use serde_json::json;
//!
//! let config = Config::from_value(json!({
//!     "agencies": [{
//!         "id": "oc-transpo",
//!         "name": "OC Transpo",
//!         "bbox": [-76.0, 45.2, -75.4, 45.6],
//!         "data": ["line-1.json"]
//!     }],
//!     "regions": [{
//!         "id": "ottawa",
//!         "title": "Ottawa",
//!         "location": [-75.7, 45.4],
//!         "bbox": [-76.1, 45.1, -75.3, 45.7],
//!         "tier": 1,
//!         "agencies": ["oc-transpo"]
//!     }]
//! }))
//! .unwrap();
//!
//! let mut files = HashMap::new();
//! files.insert("line-1.json".to_string(), json!({
//!     "type": "FeatureCollection",
//!     "metadata": { "id": "oc-1", "name": "Line 1", "type": "rail-line", "color": "#da291c" },
//!     "features": [{
//!         "type": "Feature",
//!         "geometry": { "type": "Point", "coordinates": [-75.72, 45.40] },
//!         "properties": { "type": "station-label", "name": "Bayview", "lines": ["2", "1"] }
//!     }]
//! }));
//!
//! let assembly = assemble(&config, &files).unwrap();
//! let stations = build_station_records(&assembly.collection, &config).unwrap();
//! assert_eq!(stations[0].description, "OC Transpo — Ottawa");
//! assert_eq!(stations[0].lines, vec!["1", "2"]);
//! ```

pub mod error;
pub mod identifiers;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod search;
pub mod source;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::error::{MapDataError, Result};
    pub use crate::identifiers::*;
    pub use crate::models::{config::*, dataset::*, feature::*, metadata::*};
    pub use crate::pipeline::{
        assemble::{assemble, Assembly},
        dedup::{dedupe, StationDeduplicator},
        enrich::{enrich, EnrichedDataset},
    };
    pub use crate::schema::{validate, Schema, SchemaError, ValidationReport};
    pub use crate::search::{
        index::{escape_query, SearchIndex, SearchResult},
        records::{build_bounds_records, build_search_seed, build_station_records},
        BoundsRecord, SearchSeed, StationRecord,
    };
    pub use crate::source::{DatasetSource, DirectorySource};
    pub use crate::spatial::{
        bbox::{compute_bbox, union_bboxes, BBox},
        containment::{check_bounds, BBoxContainmentError},
    };
}

pub use prelude::*;
