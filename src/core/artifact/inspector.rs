// ─── Artifact Inspector ───
// Opens the produced archive, confirms it is a well-formed container, and
// checks for the loader-specific metadata entry. Presence-only: the
// metadata file's internal structure is never parsed, so this check stays
// decoupled from loader schema evolution.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::LoaderType;

/// Every jar must carry the standard manifest entry.
pub const JAR_MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Outcome of a successful inspection.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub path: PathBuf,
    pub entry_count: usize,
    pub metadata_entry: String,
}

/// Inspect the artifact at `path` for the given loader.
///
/// Fails when the file is missing or empty, when any archive member cannot
/// be read end to end, or when a required entry is absent.
pub fn inspect(path: &Path, loader: LoaderType) -> CheckResult<InspectionReport> {
    let metadata =
        std::fs::metadata(path).map_err(|_| CheckError::ArtifactMissing(path.to_path_buf()))?;
    if metadata.len() == 0 {
        return Err(CheckError::ArtifactEmpty(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| CheckError::ArtifactCorrupt {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    // Structural validity: every member must be readable end to end.
    let mut sink = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| CheckError::ArtifactCorrupt {
            path: path.to_path_buf(),
            detail: format!("member #{index}: {e}"),
        })?;
        let name = entry.name().to_string();
        sink.clear();
        entry
            .read_to_end(&mut sink)
            .map_err(|e| CheckError::ArtifactCorrupt {
                path: path.to_path_buf(),
                detail: format!("member '{name}': {e}"),
            })?;
        debug!("Read archive member '{}' ({} bytes)", name, sink.len());
    }

    for required in [JAR_MANIFEST_ENTRY, loader.metadata_entry()] {
        if archive.by_name(required).is_err() {
            return Err(CheckError::MissingEntry {
                path: path.to_path_buf(),
                entry: required.to_string(),
            });
        }
    }

    info!(
        "Inspected {:?}: {} entries, {} metadata present",
        path,
        archive.len(),
        loader.metadata_entry()
    );

    Ok(InspectionReport {
        path: path.to_path_buf(),
        entry_count: archive.len(),
        metadata_entry: loader.metadata_entry().to_string(),
    })
}
