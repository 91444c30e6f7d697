use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::CheckError;

/// Supported mod loaders — strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    Forge,
    NeoForge,
    Fabric,
}

impl LoaderType {
    /// Every loader this pipeline recognizes, in canonical order.
    pub const ALL: [LoaderType; 3] = [LoaderType::Forge, LoaderType::NeoForge, LoaderType::Fabric];

    /// Loader-specific metadata entry that must be present inside a built jar.
    pub fn metadata_entry(&self) -> &'static str {
        match self {
            LoaderType::Forge => "META-INF/mods.toml",
            LoaderType::NeoForge => "META-INF/neoforge.mods.toml",
            LoaderType::Fabric => "fabric.mod.json",
        }
    }
}

impl fmt::Display for LoaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderType::Forge => write!(f, "forge"),
            LoaderType::NeoForge => write!(f, "neoforge"),
            LoaderType::Fabric => write!(f, "fabric"),
        }
    }
}

impl FromStr for LoaderType {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forge" => Ok(LoaderType::Forge),
            "neoforge" => Ok(LoaderType::NeoForge),
            "fabric" => Ok(LoaderType::Fabric),
            other => Err(CheckError::UnknownLoader(other.to_string())),
        }
    }
}

/// Render a loader set the way diagnostics expect it: `forge, fabric`.
pub fn join_loaders<'a, I>(loaders: I) -> String
where
    I: IntoIterator<Item = &'a LoaderType>,
{
    loaders
        .into_iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
