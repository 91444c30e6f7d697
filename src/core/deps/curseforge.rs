use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::manifest::DependencyEntry;
use super::{DependencySource, ResolvedFile};
use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::LoaderType;

/// CurseForge files API, served through the curse.tools proxy so no API key
/// is required in CI.
pub const CURSEFORGE_API_BASE: &str = "https://api.curse.tools/v1/cf";

/// `algo` value CurseForge uses for SHA-1 digests.
const CURSEFORGE_ALGO_SHA1: u32 = 1;

#[derive(Debug, Deserialize)]
struct FileResponse {
    data: CurseForgeFile,
}

/// Subset of a CurseForge file record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurseForgeFile {
    #[serde(default)]
    pub download_url: Option<String>,
    pub file_name: String,
    #[serde(default)]
    pub hashes: Vec<CurseForgeHash>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurseForgeHash {
    pub value: String,
    pub algo: u32,
}

impl CurseForgeFile {
    pub fn sha1(&self) -> Option<&str> {
        self.hashes
            .iter()
            .find(|h| h.algo == CURSEFORGE_ALGO_SHA1)
            .map(|h| h.value.as_str())
    }
}

pub struct CurseForgeSource {
    client: reqwest::Client,
    base: String,
}

impl CurseForgeSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base(client, CURSEFORGE_API_BASE)
    }

    pub fn with_base(client: reqwest::Client, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }
}

#[async_trait]
impl DependencySource for CurseForgeSource {
    async fn resolve(
        &self,
        entry: &DependencyEntry,
        _loader: LoaderType,
        _minecraft_version: &str,
    ) -> CheckResult<ResolvedFile> {
        let mod_id = entry.identifiers.curseforge_id.as_ref().ok_or_else(|| {
            CheckError::Manifest(format!(
                "dependency '{}': curseforge source requires identifiers.curseforge_id",
                entry.name
            ))
        })?;
        let file_id = entry
            .identifiers
            .curseforge_file_id
            .as_ref()
            .ok_or_else(|| {
                CheckError::Manifest(format!(
                    "dependency '{}': curseforge source requires identifiers.curseforge_file_id",
                    entry.name
                ))
            })?;

        let url = format!("{}/mods/{}/files/{}", self.base, mod_id, file_id);
        debug!("Querying CurseForge for {} (file {})", entry.name, file_id);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::RegistryStatus {
                name: entry.name.clone(),
                status: status.as_u16(),
            });
        }

        let payload: FileResponse = response.json().await?;
        let file = payload.data;

        let sha1 = file.sha1().map(str::to_string);

        let download_url = file.download_url.ok_or_else(|| CheckError::RegistryResponse {
            name: entry.name.clone(),
            field: "downloadUrl".to_string(),
        })?;
        Ok(ResolvedFile {
            url: download_url,
            file_name: file.file_name,
            sha1,
        })
    }
}
