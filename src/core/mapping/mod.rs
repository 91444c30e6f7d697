// ─── Mapping Classification ───
// Infers which symbol-naming convention an artifact's bytecode uses from
// string-level evidence only. Each loader expects a specific convention; a
// mismatch means the build produced (or was fed) an incompatible artifact.

pub mod classifier;
pub mod evidence;

pub use classifier::{MappingScores, MappingVerdict, VerdictStatus};
pub use evidence::MappingEvidence;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol-naming conventions a built jar may carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MappingType {
    Srg,
    Mojmap,
    Intermediary,
    /// Strong evidence for more than one convention at once — reported,
    /// never guessed away.
    Mixed,
    /// No convention detected. Trivial artifacts legitimately carry no
    /// loader-identifying bytecode evidence.
    Unknown,
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingType::Srg => write!(f, "srg"),
            MappingType::Mojmap => write!(f, "mojmap"),
            MappingType::Intermediary => write!(f, "intermediary"),
            MappingType::Mixed => write!(f, "mixed"),
            MappingType::Unknown => write!(f, "unknown"),
        }
    }
}
