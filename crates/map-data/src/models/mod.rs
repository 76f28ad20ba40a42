//! Config, dataset and feature models.

pub mod config;
pub mod dataset;
pub mod feature;
pub mod metadata;

// Re-exports for convenience
pub use config::{Agency, Config, Region, Tier};
pub use dataset::LineDataset;
pub use feature::{DerivedProperties, Feature, FeatureCollection, FeatureKind, FeatureProperties, StationLabel};
pub use metadata::{EnrichedMetadata, LineMetadata, LineType};
