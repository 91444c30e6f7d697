// ─── Build Context ───
// The resolved, read-only state shared by every downstream component.
// Constructed once per invocation from the property file and the directory
// tree; never mutated afterwards.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::info;

use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::{join_loaders, LoaderType};
use crate::core::properties::BuildProperties;
use crate::core::structure;

/// NeoForge split off with its own metadata contract at this game version;
/// anything older cannot be a valid NeoForge target.
pub const NEOFORGE_MIN_MINECRAFT: &str = "1.20.2";

/// Immutable per-invocation build state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub minecraft_version: String,
    pub mod_id: String,
    pub mod_version: String,
    pub loader_multi: bool,
    /// Loaders the build must produce artifacts for, in declaration order.
    pub active_loaders: Vec<LoaderType>,
    /// Loaders inferred from the directory structure.
    pub detected_loaders: BTreeSet<LoaderType>,
    pub java_version: Option<u32>,
}

impl BuildContext {
    /// Resolve a context from validated properties plus detected modules.
    ///
    /// Enforces the structure-authoritative rule and the NeoForge minimum
    /// game version before any artifact work can begin.
    pub fn resolve(
        properties: BuildProperties,
        detected_loaders: BTreeSet<LoaderType>,
    ) -> CheckResult<Self> {
        structure::cross_check(&detected_loaders, &properties)?;

        let active_loaders = if properties.loader_multi {
            properties.active_loaders.clone()
        } else {
            let loader = properties.loader_type.ok_or_else(|| {
                CheckError::Property("loader_type is required when loader_multi=false".to_string())
            })?;
            vec![loader]
        };

        if active_loaders.contains(&LoaderType::NeoForge)
            && compare_versions(&properties.minecraft_version, NEOFORGE_MIN_MINECRAFT)
                == Ordering::Less
        {
            return Err(CheckError::Property(format!(
                "neoforge requires minecraft_version >= {NEOFORGE_MIN_MINECRAFT}, got {}",
                properties.minecraft_version
            )));
        }

        info!(
            "Resolved build context: {} {} for MC {} (loaders: {})",
            properties.mod_id,
            properties.mod_version,
            properties.minecraft_version,
            join_loaders(active_loaders.iter())
        );

        Ok(Self {
            minecraft_version: properties.minecraft_version,
            mod_id: properties.mod_id,
            mod_version: properties.mod_version,
            loader_multi: properties.loader_multi,
            active_loaders,
            detected_loaders,
            java_version: properties.java_version,
        })
    }

    pub fn is_active(&self, loader: LoaderType) -> bool {
        self.active_loaders.contains(&loader)
    }
}

/// Compare dotted version strings by their numeric segments.
/// `1.20.2` < `1.21` < `1.21.1`; non-digit characters act as separators.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    version_key(a).cmp(&version_key(b))
}

fn version_key(version: &str) -> Vec<u64> {
    let mut key = Vec::new();
    let mut current = String::new();
    for c in version.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            key.push(current.parse().unwrap_or(u64::MAX));
            current.clear();
        }
    }
    if !current.is_empty() {
        key.push(current.parse().unwrap_or(u64::MAX));
    }
    key
}
