//! Stamping region, agency and line properties onto a dataset's features.

use crate::error::{MapDataError, Result};
use crate::models::config::{Agency, Region};
use crate::models::dataset::LineDataset;
use crate::models::feature::{DerivedProperties, Feature};
use crate::models::metadata::EnrichedMetadata;
use crate::spatial::bbox::compute_bbox;

#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedDataset {
    pub metadata: EnrichedMetadata,
    pub features: Vec<Feature>,
}

/// Enrich every feature of `dataset` for the given region and agency.
///
/// The dataset is only read; features are copied, so enrichment of separate
/// datasets shares no mutable state. Derived properties already present on a
/// feature are overwritten.
pub fn enrich(region: &Region, agency: &Agency, dataset: &LineDataset) -> Result<EnrichedDataset> {
    let metadata = &dataset.metadata;

    let bbox = compute_bbox(&dataset.features)
        .ok_or_else(|| MapDataError::EmptyDataset(metadata.id.clone()))?;

    let derived = DerivedProperties {
        region: Some(region.id.clone()),
        agency: Some(agency.id.clone()),
        filter_key: metadata.filter_key.clone(),
        parent: Some(metadata.id.clone()),
        class: Some(metadata.line_type),
        color: Some(metadata.color.clone()),
        offset: metadata.offset,
    };

    let features = dataset
        .features
        .iter()
        .map(|feature| {
            let mut feature = feature.clone();
            feature.properties.derived = derived.clone();
            feature
        })
        .collect();

    Ok(EnrichedDataset {
        metadata: EnrichedMetadata {
            metadata: metadata.clone(),
            agency: agency.id.clone(),
            region: region.id.clone(),
            bbox,
        },
        features,
    })
}
