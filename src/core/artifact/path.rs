use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::context::BuildContext;
use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::{join_loaders, LoaderType};

/// Describes the single legal build output for one loader.
///
/// The relative path is a pure function of the descriptor fields; there is
/// no per-project customization.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub loader: LoaderType,
    pub minecraft_version: String,
    pub mod_id: String,
    pub mod_version: String,
    /// Multi-loader projects nest the output under a loader subdirectory.
    pub multi_loader: bool,
}

impl ArtifactDescriptor {
    /// Resolve the descriptor for a loader selection.
    ///
    /// Single-loader: `requested` must equal the sole active loader and
    /// defaults to it when omitted. Multi-loader: `requested` is mandatory
    /// and must be a member of the active set.
    pub fn resolve(context: &BuildContext, requested: Option<LoaderType>) -> CheckResult<Self> {
        let active = join_loaders(context.active_loaders.iter());

        let loader = if context.loader_multi {
            let loader = requested.ok_or(CheckError::LoaderRequired {
                active: active.clone(),
            })?;
            if !context.is_active(loader) {
                return Err(CheckError::LoaderNotActive {
                    requested: loader.to_string(),
                    active,
                });
            }
            loader
        } else {
            let sole = *context
                .active_loaders
                .first()
                .ok_or_else(|| CheckError::Other("context has no active loader".to_string()))?;
            match requested {
                None => sole,
                Some(loader) if loader == sole => loader,
                Some(loader) => {
                    return Err(CheckError::LoaderNotActive {
                        requested: loader.to_string(),
                        active,
                    })
                }
            }
        };

        Ok(Self {
            loader,
            minecraft_version: context.minecraft_version.clone(),
            mod_id: context.mod_id.clone(),
            mod_version: context.mod_version.clone(),
            multi_loader: context.loader_multi,
        })
    }

    /// Build the artifact filename.
    ///
    /// `{mod_id}-{loader}-{minecraft_version}-{mod_version}.jar`
    pub fn filename(&self) -> String {
        format!(
            "{}-{}-{}-{}.jar",
            self.mod_id, self.loader, self.minecraft_version, self.mod_version
        )
    }

    /// Path relative to the repository root.
    ///
    /// Single-loader: `build/libs/<filename>`
    /// Multi-loader:  `<loader>/build/libs/<filename>`
    pub fn relative_path(&self) -> PathBuf {
        let libs = PathBuf::from("build").join("libs").join(self.filename());
        if self.multi_loader {
            PathBuf::from(self.loader.to_string()).join(libs)
        } else {
            libs
        }
    }

    /// Absolute path under the given repository root.
    pub fn absolute_path(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}
