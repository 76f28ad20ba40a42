//! Checking declared bounding boxes against the data they describe.
//!
//! This is an authoring check, not part of assembly: the assembler never
//! corrects a bbox, and a violation here is reported rather than raised.

use std::fmt;

use crate::error::Result;
use crate::identifiers::*;
use crate::models::config::{Agency, Config, Region};
use crate::source::DatasetSource;
use crate::spatial::bbox::{compute_bbox, union_bboxes, BBox};

#[derive(Clone, Debug, PartialEq)]
pub enum BoundsSubject {
    Agency(AgencyId),
    Region(RegionId),
    Dataset(String),
}

impl fmt::Display for BoundsSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agency(id) => write!(f, "agency '{id}'"),
            Self::Region(id) => write!(f, "region '{id}'"),
            Self::Dataset(file_ref) => write!(f, "dataset '{file_ref}'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{subject} declares bbox {declared} which does not contain its data bbox {computed}")]
pub struct BBoxContainmentError {
    pub subject: BoundsSubject,
    pub declared: BBox,
    pub computed: BBox,
}

/// Envelope of all features in the agency's files; `None` if it has none.
pub fn agency_data_bbox(agency: &Agency, source: &impl DatasetSource) -> Result<Option<BBox>> {
    let mut boxes = Vec::with_capacity(agency.data.len());
    for file_ref in &agency.data {
        let dataset = source.load_dataset(file_ref)?;
        boxes.extend(compute_bbox(&dataset.features));
    }
    Ok(union_bboxes(boxes))
}

/// Envelope of the declared bboxes of the region's agencies.
pub fn region_agencies_bbox(region: &Region, config: &Config) -> Result<Option<BBox>> {
    let boxes = region
        .agencies
        .iter()
        .map(|id| {
            config
                .require_agency(id.as_str(), format_args!("region '{}'", region.id))
                .map(|agency| agency.bbox)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(union_bboxes(boxes))
}

/// Check every agency, region and self-describing dataset in the config.
///
/// Unknown references and unreadable files are errors; bbox violations are
/// collected and returned.
pub fn check_bounds(config: &Config, source: &impl DatasetSource) -> Result<Vec<BBoxContainmentError>> {
    let mut violations = Vec::new();

    for agency in &config.agencies {
        let mut boxes = Vec::with_capacity(agency.data.len());
        for file_ref in &agency.data {
            let dataset = source.load_dataset(file_ref)?;
            let Some(computed) = compute_bbox(&dataset.features) else {
                continue;
            };
            if let Some(declared) = dataset.bbox {
                check(&mut violations, BoundsSubject::Dataset(file_ref.clone()), declared, computed);
            }
            boxes.push(computed);
        }

        if let Some(computed) = union_bboxes(boxes) {
            check(&mut violations, BoundsSubject::Agency(agency.id.clone()), agency.bbox, computed);
        }
    }

    for region in &config.regions {
        if let Some(computed) = region_agencies_bbox(region, config)? {
            check(&mut violations, BoundsSubject::Region(region.id.clone()), region.bbox, computed);
        }
    }

    for violation in &violations {
        log::warn!("{violation}");
    }

    Ok(violations)
}

fn check(violations: &mut Vec<BBoxContainmentError>, subject: BoundsSubject, declared: BBox, computed: BBox) {
    if !declared.contains(&computed) {
        violations.push(BBoxContainmentError {
            subject,
            declared,
            computed,
        });
    }
}
