// ─── Modcheck Core ───
// Contract-enforcement pipeline for multi-loader Minecraft mod builds.
//
// Architecture:
//   core/
//     properties  — canonical property file parse + validation
//     structure   — structure-authoritative loader module detection
//     context     — resolved, read-only per-invocation build state
//     artifact/   — deterministic artifact path + archive inspection
//     mapping/    — evidence sampling + mapping-type classification
//     deps/       — pinned dependency manifest + registry resolution
//     downloader  — sequential SHA-1 validated downloads
//     pipeline    — fail-fast orchestrator
//     report      — machine-consumable key=value / JSON summaries

pub mod artifact;
pub mod context;
pub mod deps;
pub mod downloader;
pub mod error;
pub mod http;
pub mod loader;
pub mod mapping;
pub mod pipeline;
pub mod properties;
pub mod report;
pub mod structure;
