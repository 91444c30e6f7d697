use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::curseforge::CurseForgeSource;
use super::manifest::{DependencyEntry, DependencyManifest, SourceKind};
use super::modrinth::ModrinthSource;
use super::{DependencySource, ResolvedFile};
use crate::core::downloader::Downloader;
use crate::core::error::{CheckError, CheckResult};
use crate::core::http::build_http_client;
use crate::core::loader::LoaderType;

/// Per-entry terminal state, in manifest order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Not applicable to the requested loader/version; silently skipped.
    FilteredOut,
    /// Downloaded, no digest available to verify against.
    Downloaded,
    /// Downloaded and SHA-1 verified.
    Verified,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryOutcome {
    pub name: String,
    pub state: EntryState,
    pub file_name: Option<String>,
}

/// Summary of a full resolution run.
#[derive(Debug, Serialize)]
pub struct Resolution {
    pub entries: Vec<EntryOutcome>,
    pub downloaded: usize,
    pub skipped: usize,
    /// Counts of the non-runtime lists, reported but never resolved.
    pub development: usize,
    pub optional: usize,
    pub incompatible: usize,
}

impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryState::FilteredOut => write!(f, "filtered_out"),
            EntryState::Downloaded => write!(f, "downloaded"),
            EntryState::Verified => write!(f, "verified"),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "downloaded={}", self.downloaded)?;
        writeln!(f, "skipped={}", self.skipped)?;
        writeln!(f, "development={}", self.development)?;
        writeln!(f, "optional={}", self.optional)?;
        writeln!(f, "incompatible={}", self.incompatible)?;
        for entry in &self.entries {
            match &entry.file_name {
                Some(file_name) => {
                    writeln!(f, "dependency={} state={} file={}", entry.name, entry.state, file_name)?
                }
                None => writeln!(f, "dependency={} state={}", entry.name, entry.state)?,
            }
        }
        Ok(())
    }
}

impl Resolution {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            downloaded: 0,
            skipped: 0,
            development: 0,
            optional: 0,
            incompatible: 0,
        }
    }
}

/// Resolves and downloads pinned dependencies, one entry at a time in
/// manifest order. The first failure aborts the whole run.
pub struct DependencyResolver {
    downloader: Downloader,
    modrinth: ModrinthSource,
    curseforge: CurseForgeSource,
}

impl DependencyResolver {
    pub fn new() -> CheckResult<Self> {
        let client = build_http_client().map_err(CheckError::Http)?;
        Ok(Self::with_sources(
            Downloader::new(client.clone()),
            ModrinthSource::new(client.clone()),
            CurseForgeSource::new(client),
        ))
    }

    pub fn with_sources(
        downloader: Downloader,
        modrinth: ModrinthSource,
        curseforge: CurseForgeSource,
    ) -> Self {
        Self {
            downloader,
            modrinth,
            curseforge,
        }
    }

    /// Run resolution for the given loader and game version.
    ///
    /// An absent manifest resolves trivially to zero dependencies.
    pub async fn run(
        &self,
        manifest: Option<&DependencyManifest>,
        loader: LoaderType,
        minecraft_version: &str,
        dest_dir: &Path,
    ) -> CheckResult<Resolution> {
        let Some(manifest) = manifest else {
            info!("No dependency manifest; nothing to resolve");
            return Ok(Resolution::empty());
        };

        let mut resolution = Resolution {
            development: manifest.dependencies.development.len(),
            optional: manifest.dependencies.optional.len(),
            incompatible: manifest.dependencies.incompatible.len(),
            ..Resolution::empty()
        };

        for entry in &manifest.dependencies.runtime {
            if !entry.applies_to(loader, minecraft_version) {
                debug!(
                    "Skipping '{}': not applicable to {} / {}",
                    entry.name, loader, minecraft_version
                );
                resolution.skipped += 1;
                resolution.entries.push(EntryOutcome {
                    name: entry.name.clone(),
                    state: EntryState::FilteredOut,
                    file_name: None,
                });
                continue;
            }

            info!("Resolving '{}' via {:?}", entry.name, entry.source.kind);
            let resolved = self.resolve_entry(entry, loader, minecraft_version).await?;

            // A manifest-level digest backs up sources that report none.
            let sha1 = resolved.sha1.clone().or_else(|| entry.sha1.clone());
            let dest = dest_dir.join(&resolved.file_name);
            self.downloader
                .download_file(&resolved.url, &dest, sha1.as_deref())
                .await?;

            let state = if sha1.is_some() {
                EntryState::Verified
            } else {
                EntryState::Downloaded
            };
            info!("Resolved '{}' -> {:?} ({:?})", entry.name, dest, state);

            resolution.downloaded += 1;
            resolution.entries.push(EntryOutcome {
                name: entry.name.clone(),
                state,
                file_name: Some(resolved.file_name),
            });
        }

        Ok(resolution)
    }

    async fn resolve_entry(
        &self,
        entry: &DependencyEntry,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> CheckResult<ResolvedFile> {
        match entry.source.kind {
            SourceKind::Modrinth => self.modrinth.resolve(entry, loader, minecraft_version).await,
            SourceKind::Curseforge => {
                self.curseforge
                    .resolve(entry, loader, minecraft_version)
                    .await
            }
            SourceKind::Url => resolve_url_entry(entry),
        }
    }
}

/// Direct-URL entries resolve without any registry round trip; the file
/// keeps the name the URL reports.
fn resolve_url_entry(entry: &DependencyEntry) -> CheckResult<ResolvedFile> {
    let url = entry.identifiers.url.as_ref().ok_or_else(|| {
        CheckError::Manifest(format!(
            "dependency '{}': url source requires identifiers.url",
            entry.name
        ))
    })?;
    let file_name = file_name_from_url(url).ok_or_else(|| {
        CheckError::Manifest(format!(
            "dependency '{}': cannot derive a file name from url '{url}'",
            entry.name
        ))
    })?;
    Ok(ResolvedFile {
        url: url.clone(),
        file_name,
        sha1: entry.sha1.clone(),
    })
}

fn file_name_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    let name = without_query.rsplit('/').next()?;
    if name.is_empty() || !name.contains('.') {
        return None;
    }
    Some(name.to_string())
}
