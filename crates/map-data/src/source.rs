//! Where line/yard documents come from.
//!
//! The assembler only asks a [`DatasetSource`] for raw JSON by file reference;
//! validation and decoding stay in the pipeline. Sources are read-only, so the
//! same source can feed both the assembler and the bounds checker.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{MapDataError, Result};
use crate::models::config::Config;
use crate::models::dataset::LineDataset;

pub trait DatasetSource {
    /// Raw, unvalidated document for `file_ref`.
    fn load(&self, file_ref: &str) -> Result<Value>;

    /// Load, schema-validate and decode `file_ref`.
    fn load_dataset(&self, file_ref: &str) -> Result<LineDataset> {
        let document = self.load(file_ref)?;
        LineDataset::from_value(document, file_ref)
    }
}

/// Reads file references relative to a data directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetSource for DirectorySource {
    fn load(&self, file_ref: &str) -> Result<Value> {
        read_json(&self.root.join(file_ref))
    }
}

/// Documents already in memory, keyed by file reference.
impl DatasetSource for HashMap<String, Value> {
    fn load(&self, file_ref: &str) -> Result<Value> {
        self.get(file_ref).cloned().ok_or_else(|| MapDataError::Io {
            path: PathBuf::from(file_ref),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in preloaded set"),
        })
    }
}

pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| MapDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&content, path)
}

fn parse_json(content: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(content).map_err(|source| MapDataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Every file reference reachable from the config, in region → agency → file
/// order, each listed once. Unknown agency ids are skipped here; the
/// assembler reports them.
pub fn file_refs(config: &Config) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    config
        .regions
        .iter()
        .flat_map(|region| region.agencies.iter())
        .filter_map(|id| config.agency(id.as_str()))
        .flat_map(|agency| agency.data.iter().map(String::as_str))
        .filter(|file_ref| seen.insert(*file_ref))
        .collect()
}

/// Read every referenced file concurrently.
///
/// Results are buffered in a map keyed by file reference; feed it to
/// [`crate::pipeline::assemble::assemble`] so the merge still happens in
/// traversal order regardless of which read finished first.
#[cfg(feature = "async")]
pub async fn preload(config: &Config, root: &Path) -> Result<HashMap<String, Value>> {
    let refs = file_refs(config);
    log::info!("Reading {} data files from {}", refs.len(), root.display());

    let reads = refs.iter().map(|file_ref| async move {
        let path = root.join(file_ref);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| MapDataError::Io {
                path: path.clone(),
                source,
            })?;
        parse_json(&content, &path)
    });
    let documents = futures_util::future::try_join_all(reads).await?;

    Ok(refs
        .into_iter()
        .map(String::from)
        .zip(documents)
        .collect())
}
