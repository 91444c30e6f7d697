use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::manifest::DependencyEntry;
use super::{DependencySource, ResolvedFile};
use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::LoaderType;

pub const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";

/// Subset of a Modrinth project version.
#[derive(Debug, Deserialize)]
pub struct ModrinthVersion {
    pub version_number: String,
    #[serde(default)]
    pub files: Vec<ModrinthFile>,
    #[serde(default)]
    pub date_published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModrinthFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub hashes: ModrinthHashes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModrinthHashes {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha512: Option<String>,
}

pub struct ModrinthSource {
    client: reqwest::Client,
    base: String,
}

impl ModrinthSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base(client, MODRINTH_API_BASE)
    }

    pub fn with_base(client: reqwest::Client, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }
}

/// Pick the file Modrinth marks primary, falling back to the first listed.
fn primary_file(version: &ModrinthVersion) -> Option<&ModrinthFile> {
    version
        .files
        .iter()
        .find(|f| f.primary)
        .or_else(|| version.files.first())
}

#[async_trait]
impl DependencySource for ModrinthSource {
    async fn resolve(
        &self,
        entry: &DependencyEntry,
        loader: LoaderType,
        minecraft_version: &str,
    ) -> CheckResult<ResolvedFile> {
        let project = entry.identifiers.modrinth_id.as_ref().ok_or_else(|| {
            CheckError::Manifest(format!(
                "dependency '{}': modrinth source requires identifiers.modrinth_id",
                entry.name
            ))
        })?;
        let pin = entry.version.default.as_ref().ok_or_else(|| {
            CheckError::Manifest(format!(
                "dependency '{}': modrinth source requires an exact version.default pin",
                entry.name
            ))
        })?;

        let url = format!("{}/project/{}/version", self.base, project);
        debug!("Querying Modrinth for {} ({})", entry.name, project);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("loaders", format!("[\"{loader}\"]")),
                ("game_versions", format!("[\"{minecraft_version}\"]")),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::RegistryStatus {
                name: entry.name.clone(),
                status: status.as_u16(),
            });
        }

        let versions: Vec<ModrinthVersion> = response.json().await?;
        let chosen = versions
            .into_iter()
            .find(|v| &v.version_number == pin)
            .ok_or_else(|| CheckError::PinNotFound {
                name: entry.name.clone(),
                pin: pin.clone(),
                registry: "modrinth".to_string(),
            })?;

        let file = primary_file(&chosen).ok_or_else(|| CheckError::RegistryResponse {
            name: entry.name.clone(),
            field: "files".to_string(),
        })?;

        Ok(ResolvedFile {
            url: file.url.clone(),
            file_name: file.filename.clone(),
            sha1: file.hashes.sha1.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_version_payload() {
        let json = r#"{
            "version_number": "0.102.0+1.21.1",
            "date_published": "2024-08-08T12:00:00Z",
            "files": [
                {
                    "url": "https://cdn.modrinth.com/data/P7dR8mSH/fabric-api.jar",
                    "filename": "fabric-api-0.102.0+1.21.1.jar",
                    "primary": true,
                    "hashes": { "sha1": "abc123" }
                }
            ]
        }"#;
        let version: ModrinthVersion = serde_json::from_str(json).unwrap();
        assert_eq!(version.version_number, "0.102.0+1.21.1");
        assert!(version.date_published.is_some());
        let file = primary_file(&version).unwrap();
        assert_eq!(file.filename, "fabric-api-0.102.0+1.21.1.jar");
        assert_eq!(file.hashes.sha1.as_deref(), Some("abc123"));
    }

    #[test]
    fn primary_file_prefers_flagged_file() {
        let version = ModrinthVersion {
            version_number: "1.0.0".to_string(),
            files: vec![
                ModrinthFile {
                    url: "https://example.com/sources.jar".to_string(),
                    filename: "sources.jar".to_string(),
                    primary: false,
                    hashes: ModrinthHashes::default(),
                },
                ModrinthFile {
                    url: "https://example.com/main.jar".to_string(),
                    filename: "main.jar".to_string(),
                    primary: true,
                    hashes: ModrinthHashes::default(),
                },
            ],
            date_published: None,
        };
        assert_eq!(primary_file(&version).unwrap().filename, "main.jar");
    }

    #[test]
    fn primary_file_falls_back_to_first() {
        let version = ModrinthVersion {
            version_number: "1.0.0".to_string(),
            files: vec![ModrinthFile {
                url: "https://example.com/only.jar".to_string(),
                filename: "only.jar".to_string(),
                primary: false,
                hashes: ModrinthHashes::default(),
            }],
            date_published: None,
        };
        assert_eq!(primary_file(&version).unwrap().filename, "only.jar");
    }

    #[test]
    fn version_without_files_yields_none() {
        let version = ModrinthVersion {
            version_number: "1.0.0".to_string(),
            files: Vec::new(),
            date_published: None,
        };
        assert!(primary_file(&version).is_none());
    }
}
