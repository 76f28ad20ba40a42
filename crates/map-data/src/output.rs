//! Rendering and writing the build artifacts.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{MapDataError, Result};
use crate::pipeline::assemble::Assembly;
use crate::search::SearchSeed;

pub const FEATURES_FILE: &str = "features.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const SEARCH_FILE: &str = "search.json";

/// Serialized artifacts, ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    pub files: Vec<(&'static str, Vec<u8>)>,
}

/// Serialize the merged collection, metadata map and search seed.
///
/// Output is deterministic: the same inputs always render to the same bytes.
pub fn render_artifacts(assembly: &Assembly, seed: &SearchSeed, pretty: bool) -> Result<Artifacts> {
    Ok(Artifacts {
        files: vec![
            (FEATURES_FILE, to_json(&assembly.collection, FEATURES_FILE, pretty)?),
            (METADATA_FILE, to_json(&assembly.metadata, METADATA_FILE, pretty)?),
            (SEARCH_FILE, to_json(seed, SEARCH_FILE, pretty)?),
        ],
    })
}

/// Write every artifact into `out_dir`.
///
/// Each file is written to a temporary sibling first and only moved into
/// place once all of them were written. If installing any artifact fails,
/// the ones already installed are rolled back to their previous contents and
/// no temporary files are left behind.
pub fn write_artifacts(artifacts: &Artifacts, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|source| io_error(out_dir, source))?;

    let mut staged: Vec<Staged> = Vec::with_capacity(artifacts.files.len());
    for (name, bytes) in &artifacts.files {
        let file = Staged {
            tmp: out_dir.join(format!(".{name}.tmp")),
            backup: out_dir.join(format!(".{name}.bak")),
            target: out_dir.join(name),
        };
        remove_quietly(&file.backup);
        if let Err(source) = std::fs::write(&file.tmp, bytes) {
            let failed = file.tmp.clone();
            staged.push(file);
            roll_back(&[], &staged);
            return Err(io_error(&failed, source));
        }
        staged.push(file);
    }

    for (i, file) in staged.iter().enumerate() {
        if let Err(source) = file.install() {
            roll_back(&staged[..i], &staged[i..]);
            return Err(io_error(&file.target, source));
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    for file in staged {
        remove_quietly(&file.backup);
        log::info!("Wrote {}", file.target.display());
        written.push(file.target);
    }

    Ok(written)
}

struct Staged {
    tmp: PathBuf,
    backup: PathBuf,
    target: PathBuf,
}

impl Staged {
    /// Move the previous artifact aside, then the staged one into place.
    fn install(&self) -> std::io::Result<()> {
        if self.target.exists() {
            std::fs::rename(&self.target, &self.backup)?;
        }
        std::fs::rename(&self.tmp, &self.target)
    }
}

/// Undo `installed` (restoring any previous artifact) and discard `pending`.
fn roll_back(installed: &[Staged], pending: &[Staged]) {
    for file in installed {
        remove_quietly(&file.target);
        if file.backup.exists() {
            if let Err(e) = std::fs::rename(&file.backup, &file.target) {
                log::warn!("Failed to restore {}: {}", file.target.display(), e);
            }
        }
    }
    for file in pending {
        remove_quietly(&file.tmp);
        // The target may have been moved aside before the failure
        if !file.target.exists() && file.backup.is_file() {
            if let Err(e) = std::fs::rename(&file.backup, &file.target) {
                log::warn!("Failed to restore {}: {}", file.target.display(), e);
            }
        }
    }
}

fn remove_quietly(path: &Path) {
    if path.is_file() {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, name: &str, pretty: bool) -> Result<Vec<u8>> {
    let result = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };
    let mut bytes = result.map_err(|source| MapDataError::Json {
        path: PathBuf::from(name),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn io_error(path: &Path, source: std::io::Error) -> MapDataError {
    MapDataError::Io {
        path: path.to_path_buf(),
        source,
    }
}
