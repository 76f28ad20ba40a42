//! Agencies, regions and the top-level config document.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MapDataError, Result};
use crate::identifiers::*;
use crate::schema::{config_schema, decode};
use crate::spatial::bbox::BBox;

// ============================================================================
// Enums
// ============================================================================

/// Map prioritization tier of a region (1 is the most prominent)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Tier {
    Primary = 1,
    Secondary = 2,
    Tertiary = 3,
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            3 => Ok(Self::Tertiary),
            other => Err(format!("tier must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier as u8
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A transit operator and the line/yard files it owns, in load order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
    pub bbox: BBox,
    /// Paths relative to the data directory
    pub data: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub title: String,
    /// `[lng, lat]` of the region label
    pub location: [f64; 2],
    pub bbox: BBox,
    pub tier: Tier,
    pub agencies: Vec<AgencyId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub agencies: Vec<Agency>,
    pub regions: Vec<Region>,
}

impl Config {
    /// Validate against the config schema and decode.
    pub fn from_value(document: Value) -> Result<Self> {
        Self::decode(document, "config")
    }

    /// Read, validate and decode a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MapDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|source| MapDataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        Self::decode(document, &path.display().to_string())
    }

    fn decode(document: Value, name: &str) -> Result<Self> {
        let config: Self = decode(document, config_schema(), name)?;
        log::debug!(
            "Loaded {} with {} agencies and {} regions",
            name,
            config.agencies.len(),
            config.regions.len()
        );
        Ok(config)
    }

    pub fn agency(&self, id: &str) -> Option<&Agency> {
        self.agencies.iter().find(|a| a.id.as_str() == id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id.as_str() == id)
    }

    /// Resolve an agency id referenced from `context`, failing on config drift.
    pub fn require_agency(&self, id: &str, context: impl fmt::Display) -> Result<&Agency> {
        self.agency(id)
            .ok_or_else(|| MapDataError::missing("agency", id, context))
    }

    pub fn require_region(&self, id: &str, context: impl fmt::Display) -> Result<&Region> {
        self.region(id)
            .ok_or_else(|| MapDataError::missing("region", id, context))
    }
}
