//! Enrichment, station deduplication and assembly of the merged dataset.

pub mod assemble;
pub mod dedup;
pub mod enrich;

pub use assemble::{assemble, Assembly};
pub use dedup::{dedupe, StationDeduplicator};
pub use enrich::{enrich, EnrichedDataset};
