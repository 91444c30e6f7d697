// ─── Dependency Manifest ───
// Strictly-schemed, pin-only manifest of auxiliary test-time dependencies.
// "latest" semantics are forbidden anywhere in the document; absence of a
// pin is a validation error, never a default.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::context::compare_versions;
use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::LoaderType;

/// The only schema version this tool accepts.
pub const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
pub struct DependencyManifest {
    pub version: String,
    #[serde(default)]
    pub settings: ManifestSettings,
    #[serde(default)]
    pub dependencies: DependencyLists,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManifestSettings {
    #[serde(default)]
    pub auto_resolve_latest: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DependencyLists {
    #[serde(default)]
    pub runtime: Vec<DependencyEntry>,
    /// The lists below are counted in reports but never resolved.
    #[serde(default)]
    pub development: Vec<DependencyEntry>,
    #[serde(default)]
    pub optional: Vec<DependencyEntry>,
    #[serde(default)]
    pub incompatible: Vec<DependencyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DependencyEntry {
    pub name: String,
    #[serde(default)]
    pub loaders: Vec<LoaderType>,
    #[serde(default)]
    pub minecraft_versions: Vec<String>,
    #[serde(default)]
    pub identifiers: Identifiers,
    #[serde(default)]
    pub version: VersionPin,
    pub source: SourceSpec,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identifiers {
    #[serde(default)]
    pub modrinth_id: Option<String>,
    #[serde(default)]
    pub curseforge_id: Option<String>,
    #[serde(default)]
    pub curseforge_file_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionPin {
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Modrinth,
    Curseforge,
    Url,
}

impl DependencyManifest {
    /// Load a manifest from disk; an absent file is not an error.
    pub fn load(path: &Path) -> CheckResult<Option<Self>> {
        if !path.exists() {
            debug!("No dependency manifest at {:?}", path);
            return Ok(None);
        }
        let text = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map(Some)
    }

    /// Parse and validate a manifest document.
    pub fn parse(text: &str) -> CheckResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(text)?;

        let forbidden = count_latest_directives(&raw);
        if forbidden > 0 {
            return Err(CheckError::LatestForbidden { count: forbidden });
        }

        let manifest: DependencyManifest = serde_yaml::from_value(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> CheckResult<()> {
        if self.version != SUPPORTED_SCHEMA_VERSION {
            return Err(CheckError::Manifest(format!(
                "unsupported schema version '{}' (supported: {SUPPORTED_SCHEMA_VERSION})",
                self.version
            )));
        }
        if self.settings.auto_resolve_latest {
            return Err(CheckError::Manifest(
                "settings.auto_resolve_latest must be false".to_string(),
            ));
        }
        for entry in &self.dependencies.runtime {
            entry.validate()?;
        }
        Ok(())
    }
}

impl DependencyEntry {
    /// Per-source minimum fields needed for a deterministic fetch.
    fn validate(&self) -> CheckResult<()> {
        if self.name.is_empty() {
            return Err(CheckError::Manifest(
                "dependency entry with empty name".to_string(),
            ));
        }
        match self.source.kind {
            SourceKind::Modrinth => {
                if self.identifiers.modrinth_id.is_none() {
                    return Err(CheckError::Manifest(format!(
                        "dependency '{}': modrinth source requires identifiers.modrinth_id",
                        self.name
                    )));
                }
                if self.version.default.is_none() {
                    return Err(CheckError::Manifest(format!(
                        "dependency '{}': modrinth source requires an exact version.default pin",
                        self.name
                    )));
                }
            }
            SourceKind::Curseforge => {
                if self.identifiers.curseforge_id.is_none()
                    || self.identifiers.curseforge_file_id.is_none()
                {
                    return Err(CheckError::Manifest(format!(
                        "dependency '{}': curseforge source requires identifiers.curseforge_id and identifiers.curseforge_file_id",
                        self.name
                    )));
                }
            }
            SourceKind::Url => {
                if self.identifiers.url.is_none() {
                    return Err(CheckError::Manifest(format!(
                        "dependency '{}': url source requires identifiers.url",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether the entry applies to the requested loader and game version.
    /// Versions match by exact value or a `*` wildcard in the list.
    pub fn applies_to(&self, loader: LoaderType, minecraft_version: &str) -> bool {
        if !self.loaders.is_empty() && !self.loaders.contains(&loader) {
            return false;
        }
        if self.minecraft_versions.is_empty() {
            return true;
        }
        self.minecraft_versions.iter().any(|v| {
            v == "*" || compare_versions(v, minecraft_version) == std::cmp::Ordering::Equal
        })
    }
}

/// Recursively count forbidden latest-resolution directives anywhere in the
/// document: `version.default: "latest"` or `version.latest: true`.
pub fn count_latest_directives(value: &serde_yaml::Value) -> usize {
    let mut count = 0;
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            for (key, child) in mapping {
                if key.as_str() == Some("version") {
                    if let serde_yaml::Value::Mapping(version) = child {
                        let default_is_latest = version
                            .get(&serde_yaml::Value::from("default"))
                            .and_then(|v| v.as_str())
                            == Some("latest");
                        let latest_is_true = version
                            .get(&serde_yaml::Value::from("latest"))
                            .and_then(|v| v.as_bool())
                            == Some(true);
                        if default_is_latest || latest_is_true {
                            count += 1;
                        }
                    }
                }
                count += count_latest_directives(child);
            }
        }
        serde_yaml::Value::Sequence(sequence) => {
            for child in sequence {
                count += count_latest_directives(child);
            }
        }
        _ => {}
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
version: "1.0"
settings:
  auto_resolve_latest: false
dependencies:
  runtime:
    - name: fabric-api
      loaders: [fabric]
      minecraft_versions: ["1.21.1"]
      identifiers:
        modrinth_id: P7dR8mSH
      version:
        default: "0.102.0+1.21.1"
      source:
        type: modrinth
    - name: some-lib
      loaders: [forge, neoforge]
      minecraft_versions: ["*"]
      identifiers:
        curseforge_id: "123456"
        curseforge_file_id: "987654"
      source:
        type: curseforge
    - name: direct-tool
      identifiers:
        url: https://example.com/files/tool-1.2.3.jar
      source:
        type: url
      sha1: 0123456789abcdef0123456789abcdef01234567
  development:
    - name: dev-helper
      identifiers:
        url: https://example.com/dev.jar
      source:
        type: url
"#;

    #[test]
    fn parses_valid_manifest() {
        let manifest = DependencyManifest::parse(VALID).unwrap();
        assert_eq!(manifest.dependencies.runtime.len(), 3);
        assert_eq!(manifest.dependencies.development.len(), 1);
        assert!(!manifest.settings.auto_resolve_latest);
    }

    #[test]
    fn absent_manifest_is_not_an_error() {
        let missing = Path::new("/nonexistent/dependencies.yml");
        assert!(DependencyManifest::load(missing).unwrap().is_none());
    }

    #[test]
    fn rejects_unsupported_schema_version() {
        let text = VALID.replace("version: \"1.0\"", "version: \"2.0\"");
        let err = DependencyManifest::parse(&text).unwrap_err();
        assert!(err.to_string().contains("2.0"));
    }

    #[test]
    fn rejects_auto_resolve_latest() {
        let text = VALID.replace("auto_resolve_latest: false", "auto_resolve_latest: true");
        let err = DependencyManifest::parse(&text).unwrap_err();
        assert!(err.to_string().contains("auto_resolve_latest"));
    }

    #[test]
    fn rejects_latest_default_pin_with_count() {
        let text = VALID.replace("default: \"0.102.0+1.21.1\"", "default: \"latest\"");
        let err = DependencyManifest::parse(&text).unwrap_err();
        match err {
            CheckError::LatestForbidden { count } => assert_eq!(count, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_latest_true_directive_at_any_depth() {
        let text = VALID.replace(
            "      version:\n        default: \"0.102.0+1.21.1\"\n",
            "      version:\n        latest: true\n",
        );
        let err = DependencyManifest::parse(&text).unwrap_err();
        assert!(matches!(err, CheckError::LatestForbidden { count: 1 }));
    }

    #[test]
    fn counts_multiple_latest_directives() {
        let text = r#"
version: "1.0"
dependencies:
  runtime:
    - name: a
      identifiers: { url: https://example.com/a.jar }
      version: { default: latest }
      source: { type: url }
  optional:
    - name: b
      identifiers: { url: https://example.com/b.jar }
      version: { latest: true }
      source: { type: url }
"#;
        let err = DependencyManifest::parse(text).unwrap_err();
        assert!(matches!(err, CheckError::LatestForbidden { count: 2 }));
    }

    #[test]
    fn modrinth_entry_requires_a_pin() {
        let text = VALID.replace(
            "      version:\n        default: \"0.102.0+1.21.1\"\n",
            "",
        );
        let err = DependencyManifest::parse(&text).unwrap_err();
        assert!(err.to_string().contains("version.default"));
    }

    #[test]
    fn curseforge_entry_requires_file_id() {
        let text = VALID.replace("        curseforge_file_id: \"987654\"\n", "");
        let err = DependencyManifest::parse(&text).unwrap_err();
        assert!(err.to_string().contains("curseforge_file_id"));
    }

    #[test]
    fn url_entry_requires_url() {
        let text = VALID.replace(
            "        url: https://example.com/files/tool-1.2.3.jar\n",
            "        modrinth_id: wrong\n",
        );
        let err = DependencyManifest::parse(&text).unwrap_err();
        assert!(err.to_string().contains("identifiers.url"));
    }

    #[test]
    fn applicability_filters_by_loader_and_version() {
        let manifest = DependencyManifest::parse(VALID).unwrap();
        let fabric_api = &manifest.dependencies.runtime[0];

        assert!(fabric_api.applies_to(LoaderType::Fabric, "1.21.1"));
        assert!(!fabric_api.applies_to(LoaderType::Forge, "1.21.1"));
        assert!(!fabric_api.applies_to(LoaderType::Fabric, "1.20.4"));
    }

    #[test]
    fn wildcard_version_matches_everything() {
        let manifest = DependencyManifest::parse(VALID).unwrap();
        let some_lib = &manifest.dependencies.runtime[1];

        assert!(some_lib.applies_to(LoaderType::Forge, "1.20.1"));
        assert!(some_lib.applies_to(LoaderType::NeoForge, "1.21.1"));
        assert!(!some_lib.applies_to(LoaderType::Fabric, "1.21.1"));
    }

    #[test]
    fn empty_filters_apply_everywhere() {
        let manifest = DependencyManifest::parse(VALID).unwrap();
        let direct = &manifest.dependencies.runtime[2];

        for loader in LoaderType::ALL {
            assert!(direct.applies_to(loader, "1.21.1"));
        }
    }
}
