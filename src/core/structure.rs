// ─── Structure Detector ───
// Infers which loader modules physically exist in the repository and
// cross-checks the declared configuration against them. Physical layout is
// the ground truth: the declaration is validated against it, never trusted
// unconditionally.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::{join_loaders, LoaderType};
use crate::core::properties::BuildProperties;

/// Files that mark a subdirectory as a loader build module.
/// Detection is by name only; contents are never read.
const BUILD_DESCRIPTORS: [&str; 2] = ["build.gradle", "build.gradle.kts"];

/// Detect loader modules: a subdirectory named exactly after the loader,
/// containing a build descriptor file.
pub fn detect_loaders(root: &Path) -> BTreeSet<LoaderType> {
    let mut detected = BTreeSet::new();

    for loader in LoaderType::ALL {
        let module_dir = root.join(loader.to_string());
        if !module_dir.is_dir() {
            continue;
        }
        if BUILD_DESCRIPTORS
            .iter()
            .any(|name| module_dir.join(name).is_file())
        {
            detected.insert(loader);
        }
    }

    debug!("Detected loader modules: {}", join_loaders(detected.iter()));
    detected
}

/// Structure-authoritative cross-check: two or more detected loader modules
/// require `loader_multi=true`.
pub fn cross_check(
    detected: &BTreeSet<LoaderType>,
    properties: &BuildProperties,
) -> CheckResult<()> {
    if detected.len() >= 2 && !properties.loader_multi {
        return Err(CheckError::StructureMismatch(format!(
            "loader modules [{}] exist on disk but loader_multi=false",
            join_loaders(detected.iter())
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_module(root: &Path, loader: &str, descriptor: &str) {
        let dir = root.join(loader);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(descriptor), "").unwrap();
    }

    fn single_forge_properties() -> BuildProperties {
        BuildProperties {
            minecraft_version: "1.21.1".to_string(),
            mod_id: "examplemod".to_string(),
            mod_version: "0.1.0".to_string(),
            loader_multi: false,
            loader_type: Some(LoaderType::Forge),
            active_loaders: Vec::new(),
            java_version: None,
        }
    }

    #[test]
    fn detects_modules_with_gradle_descriptor() {
        let tmp = TempDir::new().unwrap();
        make_module(tmp.path(), "forge", "build.gradle");
        make_module(tmp.path(), "fabric", "build.gradle.kts");

        let detected = detect_loaders(tmp.path());
        assert!(detected.contains(&LoaderType::Forge));
        assert!(detected.contains(&LoaderType::Fabric));
        assert!(!detected.contains(&LoaderType::NeoForge));
    }

    #[test]
    fn directory_without_descriptor_is_not_a_module() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("forge")).unwrap();

        assert!(detect_loaders(tmp.path()).is_empty());
    }

    #[test]
    fn descriptor_contents_are_irrelevant() {
        let tmp = TempDir::new().unwrap();
        make_module(tmp.path(), "neoforge", "build.gradle");

        let detected = detect_loaders(tmp.path());
        assert_eq!(detected.len(), 1);
        assert!(detected.contains(&LoaderType::NeoForge));
    }

    #[test]
    fn two_detected_modules_with_single_declaration_fail() {
        let detected: BTreeSet<_> = [LoaderType::Forge, LoaderType::Fabric].into_iter().collect();
        let err = cross_check(&detected, &single_forge_properties()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("forge"));
        assert!(message.contains("fabric"));
        assert!(message.contains("loader_multi=false"));
    }

    #[test]
    fn single_detected_module_passes_cross_check() {
        let detected: BTreeSet<_> = [LoaderType::Forge].into_iter().collect();
        assert!(cross_check(&detected, &single_forge_properties()).is_ok());
    }

    #[test]
    fn multi_declaration_accepts_many_detected_modules() {
        let detected: BTreeSet<_> = [LoaderType::Forge, LoaderType::Fabric].into_iter().collect();
        let mut properties = single_forge_properties();
        properties.loader_multi = true;
        properties.loader_type = None;
        properties.active_loaders = vec![LoaderType::Forge, LoaderType::Fabric];
        assert!(cross_check(&detected, &properties).is_ok());
    }
}
