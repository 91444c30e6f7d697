// ─── Dependency Resolution ───
// Deterministic, pinned acquisition of auxiliary test-time dependencies
// from Modrinth, CurseForge, or direct URLs. Nothing here ever resolves
// "latest"; every fetch is driven by an exact pin from the manifest.

pub mod curseforge;
pub mod manifest;
pub mod modrinth;
pub mod resolver;

pub use manifest::{DependencyEntry, DependencyManifest, SourceKind};
pub use resolver::{DependencyResolver, EntryOutcome, EntryState, Resolution};

use async_trait::async_trait;

use crate::core::error::CheckResult;
use crate::core::loader::LoaderType;

/// A registry file pinned down to a concrete URL.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub url: String,
    pub file_name: String,
    pub sha1: Option<String>,
}

/// One protocol per source kind.
#[async_trait]
pub trait DependencySource: Send + Sync {
    async fn resolve(
        &self,
        entry: &DependencyEntry,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> CheckResult<ResolvedFile>;
}
