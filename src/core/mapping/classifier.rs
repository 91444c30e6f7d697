use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::info;

use super::evidence::MappingEvidence;
use super::MappingType;
use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::LoaderType;

/// Minimum token counts before a convention is claimed. Deliberately
/// conservative: a convention must be clearly and repeatedly present, not
/// merely possible by chance.
pub const INTERMEDIARY_MIN_HITS: usize = 25;
pub const SRG_MIN_HITS: usize = 25;
pub const MOJMAP_MIN_HITS: usize = 10;

/// Fabric intermediary tokens: `class_NNNN` / `method_NNNN`.
fn intermediary_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"\bclass_[0-9]{2,}").expect("static pattern"),
            Regex::new(r"\bmethod_[0-9]{2,}").expect("static pattern"),
        ]
    })
}

/// SRG tokens: `func_NNNNN_x` / `field_NNNNN_x`.
fn srg_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"\bfunc_[0-9]+_[A-Za-z_]+").expect("static pattern"),
            Regex::new(r"\bfield_[0-9]+_[A-Za-z_]+").expect("static pattern"),
        ]
    })
}

/// Mojmap evidence: nested, human-readable `net.minecraft` package paths.
/// The flat `net/minecraft/class_NNNN` shape intermediary uses does not
/// match — the segment after `minecraft` must itself be a plain package
/// name followed by another path separator.
fn mojmap_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"net[./]minecraft[./][a-z][a-z0-9]*[./][A-Za-z][A-Za-z0-9_$./]*")
            .expect("static pattern")
    })
}

/// The three independent scores, plus the pure classification decision.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MappingScores {
    pub intermediary: usize,
    pub srg: usize,
    pub mojmap: usize,
}

impl MappingScores {
    /// Count every token family across the evidence corpus.
    pub fn of(evidence: &MappingEvidence) -> Self {
        let mut scores = Self::default();
        for line in evidence.lines() {
            for pattern in intermediary_patterns() {
                scores.intermediary += pattern.find_iter(line).count();
            }
            for pattern in srg_patterns() {
                scores.srg += pattern.find_iter(line).count();
            }
            scores.mojmap += mojmap_pattern().find_iter(line).count();
        }
        scores
    }

    fn hits(&self) -> [bool; 3] {
        [
            self.intermediary >= INTERMEDIARY_MIN_HITS,
            self.srg >= SRG_MIN_HITS,
            self.mojmap >= MOJMAP_MIN_HITS,
        ]
    }

    /// Pure decision function: two or more simultaneous hits are ambiguous
    /// and reported as `mixed`; one hit names the convention; none is
    /// `unknown`.
    pub fn classify(&self) -> MappingType {
        match self.hits() {
            [true, true, _] | [true, _, true] | [_, true, true] => MappingType::Mixed,
            [true, false, false] => MappingType::Intermediary,
            [false, true, false] => MappingType::Srg,
            [false, false, true] => MappingType::Mojmap,
            [false, false, false] => MappingType::Unknown,
        }
    }
}

/// Conventions each loader's toolchain is allowed to produce.
pub fn expected_mappings(loader: LoaderType) -> &'static [MappingType] {
    match loader {
        LoaderType::Forge => &[MappingType::Srg, MappingType::Mojmap],
        LoaderType::NeoForge => &[MappingType::Mojmap],
        LoaderType::Fabric => &[MappingType::Intermediary],
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictStatus::Pass => write!(f, "pass"),
            VerdictStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Classification outcome judged against a loader's expectation.
#[derive(Debug, Clone, Serialize)]
pub struct MappingVerdict {
    pub loader: LoaderType,
    pub classified: MappingType,
    pub expected: Vec<MappingType>,
    pub scores: MappingScores,
    pub status: VerdictStatus,
}

impl MappingVerdict {
    /// Judge scores against the loader's expected set.
    ///
    /// `unknown` passes for every loader: a string heuristic cannot tell
    /// "genuinely no identifying code" apart from "sample too small", and
    /// trivial artifacts are legitimate. `mixed` or a clearly wrong single
    /// classification fails.
    pub fn judge(loader: LoaderType, scores: MappingScores) -> Self {
        let classified = scores.classify();
        let expected = expected_mappings(loader);
        let pass = classified == MappingType::Unknown || expected.contains(&classified);

        info!(
            "Mapping verdict for {}: classified {} (intermediary={}, srg={}, mojmap={}) -> {}",
            loader,
            classified,
            scores.intermediary,
            scores.srg,
            scores.mojmap,
            if pass { "pass" } else { "fail" }
        );

        Self {
            loader,
            classified,
            expected: expected.to_vec(),
            scores,
            status: if pass {
                VerdictStatus::Pass
            } else {
                VerdictStatus::Fail
            },
        }
    }

    /// Turn a failed verdict into the pipeline's hard error.
    pub fn require_pass(&self) -> CheckResult<()> {
        match self.status {
            VerdictStatus::Pass => Ok(()),
            VerdictStatus::Fail => Err(CheckError::MappingMismatch {
                loader: self.loader.to_string(),
                observed: self.classified.to_string(),
                expected: self
                    .expected
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srg_lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("func_{}_a", 70000 + i)).collect()
    }

    fn intermediary_lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("method_{}", 10000 + i)).collect()
    }

    fn mojmap_lines(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("net.minecraft.world.entity.Entity{i}"))
            .collect()
    }

    fn scores_of(lines: Vec<String>) -> MappingScores {
        MappingScores::of(&MappingEvidence::from_lines(lines))
    }

    #[test]
    fn strong_srg_evidence_classifies_srg() {
        let scores = scores_of(srg_lines(25));
        assert_eq!(scores.srg, 25);
        assert_eq!(scores.intermediary, 0);
        assert_eq!(scores.mojmap, 0);
        assert_eq!(scores.classify(), MappingType::Srg);
    }

    #[test]
    fn strong_intermediary_evidence_classifies_intermediary() {
        let scores = scores_of(intermediary_lines(25));
        assert_eq!(scores.intermediary, 25);
        assert_eq!(scores.classify(), MappingType::Intermediary);
    }

    #[test]
    fn strong_mojmap_evidence_classifies_mojmap() {
        let scores = scores_of(mojmap_lines(10));
        assert_eq!(scores.mojmap, 10);
        assert_eq!(scores.classify(), MappingType::Mojmap);
    }

    #[test]
    fn below_threshold_classifies_unknown() {
        assert_eq!(scores_of(srg_lines(24)).classify(), MappingType::Unknown);
        assert_eq!(
            scores_of(intermediary_lines(24)).classify(),
            MappingType::Unknown
        );
        assert_eq!(scores_of(mojmap_lines(9)).classify(), MappingType::Unknown);
    }

    #[test]
    fn simultaneous_strong_evidence_classifies_mixed() {
        let mut lines = srg_lines(25);
        lines.extend(intermediary_lines(25));
        assert_eq!(scores_of(lines).classify(), MappingType::Mixed);
    }

    #[test]
    fn empty_corpus_classifies_unknown() {
        assert_eq!(scores_of(Vec::new()).classify(), MappingType::Unknown);
    }

    #[test]
    fn srg_field_subpattern_contributes_to_srg_score() {
        let lines = vec!["field_70158_a".to_string(), "func_71410_x".to_string()];
        let scores = scores_of(lines);
        assert_eq!(scores.srg, 2);
        assert_eq!(scores.intermediary, 0);
    }

    #[test]
    fn intermediary_class_paths_do_not_count_as_mojmap() {
        let lines: Vec<String> = (0..30)
            .map(|i| format!("net/minecraft/class_{}", 1000 + i))
            .collect();
        let scores = scores_of(lines);
        assert_eq!(scores.mojmap, 0);
        assert!(scores.intermediary >= INTERMEDIARY_MIN_HITS);
        assert_eq!(scores.classify(), MappingType::Intermediary);
    }

    #[test]
    fn bare_intermediary_field_tokens_do_not_count_as_srg() {
        let lines = vec!["field_9012".to_string(), "field_9013".to_string()];
        let scores = scores_of(lines);
        assert_eq!(scores.srg, 0);
    }

    #[test]
    fn slash_form_mojmap_paths_count() {
        let lines: Vec<String> = (0..10)
            .map(|i| format!("net/minecraft/server/level/ServerLevel{i}"))
            .collect();
        assert_eq!(scores_of(lines).classify(), MappingType::Mojmap);
    }

    #[test]
    fn unknown_passes_for_every_loader() {
        for loader in LoaderType::ALL {
            let verdict = MappingVerdict::judge(loader, MappingScores::default());
            assert_eq!(verdict.classified, MappingType::Unknown);
            assert_eq!(verdict.status, VerdictStatus::Pass);
            assert!(verdict.require_pass().is_ok());
        }
    }

    #[test]
    fn mixed_fails_for_every_loader() {
        let scores = MappingScores {
            intermediary: 30,
            srg: 30,
            mojmap: 0,
        };
        for loader in LoaderType::ALL {
            let verdict = MappingVerdict::judge(loader, scores);
            assert_eq!(verdict.classified, MappingType::Mixed);
            assert_eq!(verdict.status, VerdictStatus::Fail);
        }
    }

    #[test]
    fn forge_accepts_srg_and_mojmap() {
        let srg = MappingScores {
            srg: 30,
            ..Default::default()
        };
        let mojmap = MappingScores {
            mojmap: 15,
            ..Default::default()
        };
        assert_eq!(
            MappingVerdict::judge(LoaderType::Forge, srg).status,
            VerdictStatus::Pass
        );
        assert_eq!(
            MappingVerdict::judge(LoaderType::Forge, mojmap).status,
            VerdictStatus::Pass
        );
    }

    #[test]
    fn neoforge_rejects_srg() {
        let scores = MappingScores {
            srg: 30,
            ..Default::default()
        };
        let verdict = MappingVerdict::judge(LoaderType::NeoForge, scores);
        assert_eq!(verdict.status, VerdictStatus::Fail);
        let err = verdict.require_pass().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("srg"));
        assert!(message.contains("mojmap"));
    }

    #[test]
    fn fabric_rejects_mojmap() {
        let scores = MappingScores {
            mojmap: 15,
            ..Default::default()
        };
        let verdict = MappingVerdict::judge(LoaderType::Fabric, scores);
        assert_eq!(verdict.status, VerdictStatus::Fail);
        let err = verdict.require_pass().unwrap_err();
        assert!(err.to_string().contains("intermediary"));
    }
}
