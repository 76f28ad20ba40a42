//! Merging every configured dataset into one collection and metadata map.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::identifiers::LineId;
use crate::models::config::Config;
use crate::models::feature::FeatureCollection;
use crate::models::metadata::EnrichedMetadata;
use crate::pipeline::enrich::enrich;
use crate::source::DatasetSource;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assembly {
    /// Enriched features in region → agency → file → feature order
    pub collection: FeatureCollection,
    /// Enriched metadata by line/yard id
    pub metadata: BTreeMap<LineId, EnrichedMetadata>,
    /// Ids declared by more than one file, once per overwrite
    pub duplicate_ids: Vec<LineId>,
}

/// Load, validate, enrich and merge every dataset the config references.
///
/// Fails fast: the first unknown agency, unreadable file or schema violation
/// aborts the run and nothing partial is returned.
pub fn assemble(config: &Config, source: &impl DatasetSource) -> Result<Assembly> {
    let mut assembly = Assembly::default();
    let mut files = 0;

    for region in &config.regions {
        for agency_id in &region.agencies {
            let agency = config.require_agency(agency_id.as_str(), format_args!("region '{}'", region.id))?;

            for file_ref in &agency.data {
                let dataset = source.load_dataset(file_ref)?;
                let enriched = enrich(region, agency, &dataset)?;
                log::debug!(
                    "  {} -> {} ({} features)",
                    file_ref,
                    enriched.metadata.metadata.id,
                    enriched.features.len()
                );

                assembly.collection.features.extend(enriched.features);

                let id = enriched.metadata.metadata.id.clone();
                if assembly.metadata.insert(id.clone(), enriched.metadata).is_some() {
                    log::warn!("Line id '{}' is declared more than once; {} overrides it", id, file_ref);
                    assembly.duplicate_ids.push(id);
                }
                files += 1;
            }
        }
    }

    log::info!(
        "Assembled {} features and {} lines from {} files",
        assembly.collection.features.len(),
        assembly.metadata.len(),
        files
    );

    Ok(assembly)
}
