// ─── Reports ───
// Structured key-value summaries per component, suitable for machine
// consumption by an orchestrating caller (CI). `Display` renders stable
// `key=value` lines; `--format json` serializes the same structs.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::loader::LoaderType;
use crate::core::mapping::{MappingScores, MappingType, VerdictStatus};

/// Verdict for one loader's artifact.
#[derive(Debug, Clone, Serialize)]
pub struct LoaderReport {
    pub loader: LoaderType,
    /// Path relative to the repository root.
    pub artifact: PathBuf,
    pub entry_count: usize,
    pub metadata_entry: String,
    pub mapping_type: MappingType,
    pub scores: MappingScores,
    pub mapping_status: VerdictStatus,
}

impl fmt::Display for LoaderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "loader={}", self.loader)?;
        writeln!(f, "artifact={}", self.artifact.display())?;
        writeln!(f, "entries={}", self.entry_count)?;
        writeln!(f, "metadata_entry={}", self.metadata_entry)?;
        writeln!(f, "mapping_type={}", self.mapping_type)?;
        writeln!(f, "score_intermediary={}", self.scores.intermediary)?;
        writeln!(f, "score_srg={}", self.scores.srg)?;
        writeln!(f, "score_mojmap={}", self.scores.mojmap)?;
        write!(f, "mapping_status={}", self.mapping_status)
    }
}

/// Aggregate verdict for a full validation run.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub mod_id: String,
    pub mod_version: String,
    pub minecraft_version: String,
    pub loader_multi: bool,
    pub loaders: Vec<LoaderReport>,
    pub status: VerdictStatus,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mod_id={}", self.mod_id)?;
        writeln!(f, "mod_version={}", self.mod_version)?;
        writeln!(f, "minecraft_version={}", self.minecraft_version)?;
        writeln!(f, "loader_multi={}", self.loader_multi)?;
        for report in &self.loaders {
            writeln!(f)?;
            writeln!(f, "{report}")?;
        }
        writeln!(f)?;
        write!(f, "status={}", self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_stable_key_value_lines() {
        let report = ValidationReport {
            mod_id: "examplemod".to_string(),
            mod_version: "0.1.0".to_string(),
            minecraft_version: "1.21.1".to_string(),
            loader_multi: false,
            loaders: vec![LoaderReport {
                loader: LoaderType::Forge,
                artifact: PathBuf::from("build/libs/examplemod-forge-1.21.1-0.1.0.jar"),
                entry_count: 3,
                metadata_entry: "META-INF/mods.toml".to_string(),
                mapping_type: MappingType::Srg,
                scores: MappingScores {
                    intermediary: 0,
                    srg: 30,
                    mojmap: 0,
                },
                mapping_status: VerdictStatus::Pass,
            }],
            status: VerdictStatus::Pass,
        };

        let text = report.to_string();
        assert!(text.contains("mod_id=examplemod"));
        assert!(text.contains("artifact=build/libs/examplemod-forge-1.21.1-0.1.0.jar"));
        assert!(text.contains("mapping_type=srg"));
        assert!(text.contains("score_srg=30"));
        assert!(text.ends_with("status=pass"));
    }

    #[test]
    fn serializes_to_json_with_lowercase_enums() {
        let report = LoaderReport {
            loader: LoaderType::NeoForge,
            artifact: PathBuf::from("neoforge/build/libs/x.jar"),
            entry_count: 1,
            metadata_entry: "META-INF/neoforge.mods.toml".to_string(),
            mapping_type: MappingType::Mojmap,
            scores: MappingScores::default(),
            mapping_status: VerdictStatus::Pass,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["loader"], "neoforge");
        assert_eq!(json["mapping_type"], "mojmap");
        assert_eq!(json["mapping_status"], "pass");
    }
}
